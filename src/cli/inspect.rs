use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

use cytocat::metadata::extract;
use cytocat::table::{format, FormattedTables};

use super::{ensure_exists, heading, problem, InspectFormat};

/// Print the metadata tables of one FCS file
pub fn run(file: &Path, output: InspectFormat) -> Result<()> {
    ensure_exists(file)?;
    info!("Inspecting {}", file.display());

    let result = extract(file);
    match output {
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
            println!("{}", json);
        }
        InspectFormat::Csv => {
            let tables = format(&result);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_csv(&tables, &mut out)?;
        }
        InspectFormat::Text => {
            println!("{}: {}", heading("File"), file.display());
            println!();
            print_tables(&format(&result));
        }
    }
    Ok(())
}

/// Text rendering shared with `browse --details`
pub fn print_tables(tables: &FormattedTables) {
    if let Some(diagnostic) = tables.diagnostic() {
        println!("{}: {}", problem("Erro de Leitura"), diagnostic);
        return;
    }

    println!("{}", heading("Informações Gerais"));
    println!("{}", tables.general);
    println!();
    println!("{}", heading("Canais"));
    println!("{}", tables.channels);
    println!();
    println!("{}", heading("Fluoróforos"));
    println!("{}", tables.fluorophores);
}

fn write_csv<W: Write>(tables: &FormattedTables, out: &mut W) -> Result<()> {
    tables.general.write_csv(&mut *out)?;
    if tables.is_failure() {
        return Ok(());
    }
    writeln!(out)?;
    tables.channels.write_csv(&mut *out)?;
    writeln!(out)?;
    tables.fluorophores.write_csv(&mut *out)?;
    Ok(())
}
