use anyhow::{Context, Result};
use std::path::Path;

use cytocat::catalog::{Assay, Catalog, CatalogError};
use cytocat::config::Config;
use cytocat::metadata::{extract, NOT_AVAILABLE};
use cytocat::table::{format, Cell, Table};

use super::etl::open_catalog;
use super::inspect::print_tables;
use super::heading;

/// List catalog contents, narrowing down by group and assay
pub fn run(
    config: &Config,
    group: Option<String>,
    assay: Option<String>,
    details: bool,
) -> Result<()> {
    let catalog = open_catalog(config)?;

    let group = match group {
        Some(group) => group,
        None => return list_groups(&catalog),
    };
    let group_id = catalog
        .group_id(&group)?
        .ok_or_else(|| CatalogError::UnknownGroup(group.clone()))?;

    let assay: Assay = match assay {
        Some(assay) => assay.parse()?,
        None => return list_assays(&catalog, &group, group_id),
    };

    let results = catalog
        .results(group_id, assay)
        .with_context(|| format!("Failed to query {} / {}", group, assay))?;

    println!("{}", heading(&format!("Resultados: {} - {}", group, assay)));
    let mut table = Table::new(["ID Animal", "Condição", "Nome do Arquivo", "Status"]);
    for entry in &results {
        let path = config.catalog.resolve(Path::new(&entry.file_path));
        let status = if path.exists() {
            "ok".to_string()
        } else {
            "arquivo não encontrado".to_string()
        };
        table.push_row(vec![
            entry.animal_id.into(),
            Cell::text(entry.condition.as_deref().unwrap_or(NOT_AVAILABLE)),
            Cell::text(file_name(&entry.file_path)),
            Cell::text(status),
        ]);
    }
    println!("{}", table);

    if details {
        for entry in &results {
            let path = config.catalog.resolve(Path::new(&entry.file_path));
            if !path.exists() {
                continue;
            }
            println!();
            println!("{}", heading(&file_name(&entry.file_path)));
            print_tables(&format(&extract(&path)));
        }
    }
    Ok(())
}

fn list_groups(catalog: &Catalog) -> Result<()> {
    let groups = catalog.groups().context("Failed to list groups")?;
    println!("{}", heading("Grupos"));
    for group in groups {
        println!("  {}", group.name);
    }
    Ok(())
}

fn list_assays(catalog: &Catalog, group: &str, group_id: i64) -> Result<()> {
    let assays = catalog
        .assays_for_group(group_id)
        .context("Failed to list assays")?;
    println!("{}", heading(&format!("Ensaios: {}", group)));
    for assay in assays {
        println!("  {}", assay);
    }
    Ok(())
}

fn file_name(relative: &str) -> String {
    Path::new(relative)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative.to_string())
}
