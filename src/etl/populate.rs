use std::fmt;

use log::{info, warn};
use serde::Serialize;

use super::{EtlError, MappingRow};
use crate::catalog::{Assay, Catalog, NewResult};
use crate::config::Config;

/// Outcome of loading a mapping into the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EtlStats {
    /// Rows inserted
    pub succeeded: usize,
    /// Rows skipped because their group or assay is unknown
    pub failed: usize,
}

impl fmt::Display for EtlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows loaded, {} rows skipped",
            self.succeeded, self.failed
        )
    }
}

/// Insert every mapping row into the catalog.
///
/// The configured groups are created first. Rows whose group is not in the
/// catalog or whose assay is unknown are skipped and counted as failed.
pub fn populate(
    catalog: &mut Catalog,
    config: &Config,
    rows: &[MappingRow],
) -> Result<EtlStats, EtlError> {
    for group in &config.groups {
        catalog.ensure_group(&group.name)?;
    }

    let mut stats = EtlStats::default();
    for (line, row) in rows.iter().enumerate() {
        let group_id = match catalog.group_id(&row.group)? {
            Some(id) => id,
            None => {
                warn!("Row {}: unknown group '{}'", line + 1, row.group);
                stats.failed += 1;
                continue;
            }
        };
        let assay: Assay = match row.assay.parse() {
            Ok(assay) => assay,
            Err(_) => {
                warn!("Row {}: unknown assay '{}'", line + 1, row.assay);
                stats.failed += 1;
                continue;
            }
        };

        catalog.insert_result(
            group_id,
            assay,
            &NewResult {
                animal_id: row.animal_id,
                file_path: &row.file_path,
                condition: None,
                experiment_date: None,
            },
        )?;
        stats.succeeded += 1;
    }

    info!("Catalog load finished: {}", stats);
    Ok(stats)
}
