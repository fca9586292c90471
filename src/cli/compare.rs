use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use cytocat::compare::compare;

use super::{ensure_exists, heading, problem, CompareFormat};

/// Print comparison statistics over several FCS files
pub fn run(files: &[PathBuf], output: CompareFormat) -> Result<()> {
    for file in files {
        ensure_exists(file)?;
    }
    info!("Comparing {} files", files.len());

    let summary = compare(files).context("Comparison failed")?;

    match output {
        CompareFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
        }
        CompareFormat::Text => {
            let (general, events) = summary.tables();
            println!("{}", heading("Arquivos"));
            println!("{}", summary.rows);
            println!();
            println!("{}", heading("Estatísticas Gerais"));
            println!("{}", general);
            println!();
            println!("{}", heading("Estatísticas de Eventos"));
            println!("{}", events);

            if !summary.failures.is_empty() {
                println!();
                for failure in &summary.failures {
                    println!("{} {}: {}", problem("Erro de Leitura"), failure.file, failure.diagnostic);
                }
            }
        }
    }
    Ok(())
}
