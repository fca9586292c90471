//! # Catalog store
//!
//! SQLite database that maps experimental groups and assays to result files.
//! A master table (`experimentos_master`) records which group and assay an
//! experiment belongs to and points at a row of the assay's detail table,
//! which holds the animal id, optional condition and the file path.
//!
//! Only file paths are persisted; FCS metadata is always read from the file.

use std::path::Path;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

mod assay;
mod error;
mod schema;

#[cfg(test)]
mod tests;

pub use assay::Assay;
pub use error::CatalogError;
pub use schema::SCHEMA_SQL;

/// A group row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// `id_grupo`
    pub id: i64,
    /// `nome_grupo`
    pub name: String,
}

/// One result file of a group + assay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    /// Animal the file belongs to, when known
    pub animal_id: Option<i64>,
    /// Path relative to the project root
    pub file_path: String,
    /// Experimental condition label
    pub condition: Option<String>,
}

/// A result file to be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResult<'a> {
    /// Animal id, when known
    pub animal_id: Option<i64>,
    /// Path relative to the project root
    pub file_path: &'a str,
    /// Experimental condition label
    pub condition: Option<&'a str>,
    /// Experiment date stored on the master row
    pub experiment_date: Option<&'a str>,
}

/// Handle to the catalog database
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) the database file, creating its directory if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("Opening catalog {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Private in-memory catalog, mostly for tests
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Create every table that does not exist yet
    pub fn create_schema(&self) -> Result<(), CatalogError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Insert the group if missing and return its id
    pub fn ensure_group(&self, name: &str) -> Result<i64, CatalogError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO grupos (nome_grupo) VALUES (?1)",
            params![name],
        )?;
        self.group_id(name)?
            .ok_or_else(|| CatalogError::UnknownGroup(name.to_string()))
    }

    /// Id of a group by name
    pub fn group_id(&self, name: &str) -> Result<Option<i64>, CatalogError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id_grupo FROM grupos WHERE nome_grupo = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// All groups ordered by name
    pub fn groups(&self) -> Result<Vec<Group>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id_grupo, nome_grupo FROM grupos ORDER BY nome_grupo")?;
        let rows = stmt.query_map([], |row| {
            Ok(Group {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct assays recorded for a group, ordered by name
    pub fn assays_for_group(&self, group_id: i64) -> Result<Vec<Assay>, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT tipo_ensaio FROM experimentos_master
             WHERE id_grupo = ?1 ORDER BY tipo_ensaio",
        )?;
        let names = stmt
            .query_map(params![group_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        names.iter().map(|name| name.parse()).collect()
    }

    /// Result files of a group + assay, ordered by animal id
    pub fn results(&self, group_id: i64, assay: Assay) -> Result<Vec<ResultEntry>, CatalogError> {
        // Table and key names come from the closed `Assay` enum, never from input
        let sql = format!(
            "SELECT d.id_animal, d.arquivo_de_resultado, d.condicao
             FROM {table} AS d
             JOIN experimentos_master AS m ON d.{key} = m.id_detalhe_ensaio
             WHERE m.id_grupo = ?1 AND m.tipo_ensaio = ?2
             ORDER BY d.id_animal",
            table = assay.detail_table(),
            key = assay.detail_key(),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![group_id, assay.name()], |row| {
            Ok(ResultEntry {
                animal_id: row.get(0)?,
                file_path: row.get(1)?,
                condition: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Record a result file: detail row then master row, in one transaction.
    ///
    /// Returns the new experiment id.
    pub fn insert_result(
        &mut self,
        group_id: i64,
        assay: Assay,
        result: &NewResult<'_>,
    ) -> Result<i64, CatalogError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let detail_sql = format!(
            "INSERT INTO {} (id_animal, arquivo_de_resultado, condicao) VALUES (?1, ?2, ?3)",
            assay.detail_table()
        );
        tx.execute(
            &detail_sql,
            params![result.animal_id, result.file_path, result.condition],
        )?;
        let detail_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO experimentos_master (id_grupo, data_experimento, tipo_ensaio, id_detalhe_ensaio)
             VALUES (?1, ?2, ?3, ?4)",
            params![group_id, result.experiment_date, assay.name(), detail_id],
        )?;
        let experiment_id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(experiment_id)
    }
}
