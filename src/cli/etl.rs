use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use cytocat::catalog::Catalog;
use cytocat::config::Config;
use cytocat::etl::{self, read_mapping, write_mapping};

/// Open the configured catalog database
pub fn open_catalog(config: &Config) -> Result<Catalog> {
    let path = config.catalog.resolve(&config.catalog.database);
    Catalog::open(&path).with_context(|| format!("Failed to open catalog: {}", path.display()))
}

/// Create the catalog schema
pub fn init_db(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    catalog
        .create_schema()
        .context("Failed to create catalog schema")?;
    println!(
        "Catalog ready: {}",
        config.catalog.resolve(&config.catalog.database).display()
    );
    Ok(())
}

/// Scan the data tree into the mapping CSV
pub fn scan(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| config.catalog.resolve(&config.catalog.mapping_csv));

    let rows = etl::scan(config).context("Failed to scan data directory")?;
    write_mapping(&output, &rows)
        .with_context(|| format!("Failed to write mapping: {}", output.display()))?;

    let unassigned = rows.iter().filter(|r| r.animal_id.is_none()).count();
    info!("{} files without animal id", unassigned);
    println!("{} files mapped into {}", rows.len(), output.display());
    Ok(())
}

/// Load the mapping CSV into the catalog
pub fn populate(config: &Config, mapping: Option<PathBuf>) -> Result<()> {
    let mapping = mapping.unwrap_or_else(|| config.catalog.resolve(&config.catalog.mapping_csv));

    let rows = read_mapping(&mapping)
        .with_context(|| format!("Failed to read mapping: {}", mapping.display()))?;
    info!("{} rows in {}", rows.len(), mapping.display());

    let mut catalog = open_catalog(config)?;
    catalog
        .create_schema()
        .context("Failed to create catalog schema")?;
    let stats = etl::populate(&mut catalog, config, &rows).context("Failed to load catalog")?;

    println!("{}", stats);
    Ok(())
}
