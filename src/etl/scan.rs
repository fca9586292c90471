use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};
use regex::Regex;

use super::{EtlError, MappingRow};
use crate::catalog::Assay;
use crate::config::{Config, GroupConfig};

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern must compile"))
}

/// Walk `<data_root>/grupo_<letter>/<assay>/` for every configured group and
/// assay and describe each FCS file found.
///
/// Missing group or assay directories are skipped.
pub fn scan(config: &Config) -> Result<Vec<MappingRow>, EtlError> {
    let data_root = config.catalog.resolved_data_root();
    let project_root = &config.catalog.project_root;
    info!("Scanning {}", data_root.display());

    let mut rows = Vec::new();
    for group in &config.groups {
        let group_dir = data_root.join(group.directory());
        if !group_dir.is_dir() {
            warn!("Group directory not found: {}", group_dir.display());
            continue;
        }

        for assay in &config.assays {
            let assay_dir = group_dir.join(assay.name());
            if !assay_dir.is_dir() {
                debug!("No {} directory in {}", assay, group_dir.display());
                continue;
            }

            let files = find_fcs_files(&assay_dir)?;
            info!("{} / {}: {} files", group.name, assay, files.len());
            for file in files {
                rows.push(mapping_row(group, *assay, &file, project_root));
            }
        }
    }

    info!("Scan found {} files", rows.len());
    Ok(rows)
}

/// All `.fcs` files below `dir` (extension case-insensitive), sorted by path
pub fn find_fcs_files(dir: &Path) -> Result<Vec<PathBuf>, EtlError> {
    let mut files = Vec::new();
    collect_fcs_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_fcs_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), EtlError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_fcs_files(&path, files)?;
        } else if is_fcs_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_fcs_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("fcs"))
        .unwrap_or(false)
}

/// First number in the file name that belongs to the group's animal range
pub fn animal_id_from_name(file_name: &str, group: &GroupConfig) -> Option<i64> {
    digit_runs()
        .find_iter(file_name)
        .filter_map(|m| m.as_str().parse::<i64>().ok())
        .find(|id| group.owns_animal(*id))
}

fn mapping_row(group: &GroupConfig, assay: Assay, file: &Path, project_root: &Path) -> MappingRow {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let animal_id = animal_id_from_name(&file_name, group);
    if animal_id.is_none() {
        debug!("No animal id in {} for {}", file_name, group.name);
    }

    MappingRow {
        group: group.name.clone(),
        assay: assay.name().to_string(),
        animal_id,
        file_path: relative_path(file, project_root),
    }
}

/// `/`-separated path of `file` relative to `root`, or the full path when
/// `file` is outside of it
fn relative_path(file: &Path, root: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
