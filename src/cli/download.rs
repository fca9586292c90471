use anyhow::{bail, Context, Result};
use log::info;
use std::path::Path;

use cytocat::catalog::{Assay, CatalogError};
use cytocat::config::Config;

use super::ensure_exists;
use super::etl::open_catalog;

/// Copy the result files of one animal into `out`
pub fn run(config: &Config, group: &str, assay: &str, animal: i64, out: &Path) -> Result<()> {
    let catalog = open_catalog(config)?;
    let group_id = catalog
        .group_id(group)?
        .ok_or_else(|| CatalogError::UnknownGroup(group.to_string()))?;
    let assay: Assay = assay.parse()?;

    let entries: Vec<_> = catalog
        .results(group_id, assay)?
        .into_iter()
        .filter(|entry| entry.animal_id == Some(animal))
        .collect();
    if entries.is_empty() {
        bail!("No {} results for animal {} in {}", assay, animal, group);
    }

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create directory: {}", out.display()))?;

    for entry in entries {
        let source = config.catalog.resolve(Path::new(&entry.file_path));
        ensure_exists(&source)?;
        let name = source
            .file_name()
            .with_context(|| format!("Not a file path: {}", entry.file_path))?;
        let target = out.join(name);

        let bytes = std::fs::copy(&source, &target)
            .with_context(|| format!("Failed to copy {}", source.display()))?;
        info!("Copied {} ({} bytes)", source.display(), bytes);
        println!("{}", target.display());
    }
    Ok(())
}
