//! # Multi-file comparison
//!
//! Extracts every file, flattens each general-info table into one row tagged
//! with the file name, stacks the rows and computes descriptive statistics.
//! Event counts are summarized on their own because they are the only field
//! guaranteed to be numeric; the text fields get presence statistics unless
//! every value happens to be numeric.

use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::metadata::extract;
use crate::table::{
    format, Cell, Table, EVENTS_METRIC, FILE_COLUMN, GENERAL_METRICS, METRIC_COLUMN, VALUE_COLUMN,
};

mod error;
mod stats;

#[cfg(test)]
mod tests;

pub use error::CompareError;
pub use stats::{ColumnSummary, NumericSummary, TextSummary, STAT_ROWS};

/// Header of the statistic-name column in rendered summary tables
pub const STAT_COLUMN: &str = "";

/// A file that could not be read during a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedFile {
    /// File name
    pub file: String,
    /// Extraction diagnostic
    pub diagnostic: String,
}

/// Aggregate view over several files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    /// One row per file: the general metrics plus `Arquivo`
    pub rows: Table,
    /// Statistics of every general column except the event count
    pub general: Vec<(String, ColumnSummary)>,
    /// Statistics of the event count
    pub events: NumericSummary,
    /// Files whose extraction failed; they contribute default values to `rows`
    pub failures: Vec<FailedFile>,
}

impl ComparisonSummary {
    /// Statistics of the general columns, one column per field
    pub fn general_table(&self) -> Table {
        let rows = stats::applicable_rows(self.general.iter().map(|(_, s)| s));
        let mut table = Table::new(
            std::iter::once(STAT_COLUMN.to_string()).chain(self.general.iter().map(|(n, _)| n.clone())),
        );
        for stat in rows {
            let mut cells = vec![Cell::text(stat)];
            cells.extend(self.general.iter().map(|(_, s)| s.cell(stat)));
            table.push_row(cells);
        }
        table
    }

    /// Statistics of the event count as a single-column table
    pub fn event_table(&self) -> Table {
        let summary = ColumnSummary::Numeric(self.events.clone());
        let mut table = Table::new([STAT_COLUMN, EVENTS_METRIC]);
        for stat in stats::applicable_rows([&summary]) {
            table.push_row(vec![Cell::text(stat), summary.cell(stat)]);
        }
        table
    }

    /// Both statistics tables: `(general_stats, event_stats)`
    pub fn tables(&self) -> (Table, Table) {
        (self.general_table(), self.event_table())
    }
}

/// Compare the general metadata of several FCS files
pub fn compare<P: AsRef<Path>>(paths: &[P]) -> Result<ComparisonSummary, CompareError> {
    if paths.is_empty() {
        return Err(CompareError::EmptyInput);
    }

    let mut per_file = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let tables = format(&extract(path));
        let mut row = match tables.general_row() {
            Some(row) => row,
            None => {
                let diagnostic = tables.diagnostic().unwrap_or_default().to_string();
                warn!("Comparing {} with default values: {}", file_name, diagnostic);
                failures.push(FailedFile {
                    file: file_name.clone(),
                    diagnostic,
                });
                default_row()
            }
        };
        row.push_column(FILE_COLUMN, Cell::text(file_name));
        per_file.push(row);
    }

    let rows = Table::vstack(&per_file);

    let event_counts: Vec<f64> = rows
        .column(EVENTS_METRIC)
        .unwrap_or_default()
        .iter()
        .map(|c| c.as_i64().unwrap_or(0) as f64)
        .collect();
    let events = NumericSummary::from_values(&event_counts).ok_or(CompareError::EmptyInput)?;

    let general_only = rows.without_columns(&[EVENTS_METRIC]);
    let general = general_only
        .columns()
        .iter()
        .filter_map(|name| {
            let cells = general_only.column(name)?;
            ColumnSummary::from_cells(&cells).map(|s| (name.clone(), s))
        })
        .collect();

    info!(
        "Compared {} files ({} unreadable), {} events in total",
        paths.len(),
        failures.len(),
        event_counts.iter().sum::<f64>()
    );

    Ok(ComparisonSummary {
        rows,
        general,
        events,
        failures,
    })
}

/// General row used for files that could not be read
fn default_row() -> Table {
    let mut general = Table::new([METRIC_COLUMN, VALUE_COLUMN]);
    for metric in GENERAL_METRICS {
        let value = if metric == EVENTS_METRIC {
            Cell::Integer(0)
        } else {
            Cell::text(crate::metadata::NOT_AVAILABLE)
        };
        general.push_row(vec![Cell::text(metric), value]);
    }
    // Both columns exist, so the pivot cannot fail
    general
        .transpose(METRIC_COLUMN, VALUE_COLUMN)
        .unwrap_or_default()
}
