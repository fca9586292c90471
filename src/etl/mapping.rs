use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::EtlError;

/// One line of the mapping CSV: a result file and where it belongs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    /// Group name as stored in the catalog
    #[serde(rename = "nome_grupo")]
    pub group: String,

    /// Assay name
    #[serde(rename = "tipo_ensaio")]
    pub assay: String,

    /// Animal id; empty in the CSV when unknown
    #[serde(rename = "id_animal")]
    pub animal_id: Option<i64>,

    /// File path relative to the project root, `/`-separated
    #[serde(rename = "caminho_arquivo")]
    pub file_path: String,
}

/// Parse mapping rows from a CSV file
pub fn read_mapping<P: AsRef<Path>>(path: P) -> Result<Vec<MappingRow>, EtlError> {
    let file = File::open(path)?;
    read_mapping_from(BufReader::new(file))
}

/// Parse mapping rows from a reader
pub fn read_mapping_from<R: Read>(reader: R) -> Result<Vec<MappingRow>, EtlError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Write mapping rows, header included, to a CSV file
pub fn write_mapping<P: AsRef<Path>>(path: P, rows: &[MappingRow]) -> Result<(), EtlError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_mapping_to(File::create(path)?, rows)
}

/// Write mapping rows to any writer
pub fn write_mapping_to<W: Write>(writer: W, rows: &[MappingRow]) -> Result<(), EtlError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer.write_record(["nome_grupo", "tipo_ensaio", "id_animal", "caminho_arquivo"])?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
