//! TOML configuration for the catalog and ETL.
//!
//! Every key is optional; the defaults reproduce the lab's directory layout:
//!
//! ```toml
//! # cytocat.toml
//! [catalog]
//! database = "database/experimentos.db"
//! project_root = "."
//! data_root = "data/raw"
//! mapping_csv = "mapeamento.csv"
//!
//! [[groups]]
//! letter = "a"
//! name = "Grupo A"
//! animal_ids = [11, 20]
//!
//! [[groups]]
//! letter = "b"
//! name = "Grupo B"
//! animal_ids = [21, 30]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::Assay;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cytocat.toml";

/// Root configuration structure for cytocat.toml files.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Paths of the catalog database and the raw data tree.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Experimental groups scanned by the ETL.
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupConfig>,

    /// Assays scanned inside each group directory.
    #[serde(default = "default_assays")]
    pub assays: Vec<Assay>,
}

/// Locations used by the catalog and the ETL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite database file.
    pub database: PathBuf,

    /// Directory that catalog file paths are relative to.
    pub project_root: PathBuf,

    /// Root of the raw data tree, relative to `project_root` unless absolute.
    pub data_root: PathBuf,

    /// Mapping CSV written by `scan` and read by `populate`.
    pub mapping_csv: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("database/experimentos.db"),
            project_root: PathBuf::from("."),
            data_root: PathBuf::from("data/raw"),
            mapping_csv: PathBuf::from("mapeamento.csv"),
        }
    }
}

impl CatalogConfig {
    /// Raw data directory resolved against the project root
    pub fn resolved_data_root(&self) -> PathBuf {
        self.project_root.join(&self.data_root)
    }

    /// Resolve a catalog-relative file path
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }
}

/// One experimental group: directory letter, display name, animal id range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupConfig {
    /// Suffix of the `grupo_<letter>` directory.
    pub letter: String,

    /// Name stored in the catalog.
    pub name: String,

    /// Inclusive range of animal ids belonging to this group.
    pub animal_ids: (i64, i64),
}

impl GroupConfig {
    /// Create a group definition
    pub fn new(letter: &str, name: &str, first_id: i64, last_id: i64) -> Self {
        Self {
            letter: letter.to_string(),
            name: name.to_string(),
            animal_ids: (first_id, last_id),
        }
    }

    /// Directory name under the data root
    pub fn directory(&self) -> String {
        format!("grupo_{}", self.letter)
    }

    /// True when `id` falls inside the group's animal id range
    pub fn owns_animal(&self, id: i64) -> bool {
        self.animal_ids.0 <= id && id <= self.animal_ids.1
    }
}

fn default_groups() -> Vec<GroupConfig> {
    vec![
        GroupConfig::new("a", "Grupo A", 11, 20),
        GroupConfig::new("b", "Grupo B", 21, 30),
        GroupConfig::new("c", "Grupo C", 31, 40),
    ]
}

fn default_assays() -> Vec<Assay> {
    Assay::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            groups: default_groups(),
            assays: default_assays(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, else `cytocat.toml` when present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Look up a group by catalog name
    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            assays = ["fagocitose"]

            [catalog]
            database = "db/catalog.db"
            project_root = "/srv/lab"

            [[groups]]
            letter = "x"
            name = "Grupo X"
            animal_ids = [1, 9]
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.catalog.database, PathBuf::from("db/catalog.db"));
        assert_eq!(config.catalog.data_root, PathBuf::from("data/raw"));
        assert_eq!(
            config.catalog.resolved_data_root(),
            PathBuf::from("/srv/lab/data/raw")
        );
        assert_eq!(config.groups, vec![GroupConfig::new("x", "Grupo X", 1, 9)]);
        assert_eq!(config.assays, vec![Assay::Fagocitose]);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [catalog]
            mapping_csv = "out/map.csv"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.catalog.mapping_csv, PathBuf::from("out/map.csv"));
        assert_eq!(config.groups.len(), 3);
        assert_eq!(config.assays.len(), 4);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(
            config.catalog.database,
            PathBuf::from("database/experimentos.db")
        );
        assert_eq!(config.group("Grupo B").unwrap().animal_ids, (21, 30));
    }

    #[test]
    fn test_unknown_assay_rejected() {
        assert!(Config::from_str(r#"assays = ["citometria"]"#).is_err());
    }

    #[test]
    fn test_group_range() {
        let group = GroupConfig::new("a", "Grupo A", 11, 20);
        assert_eq!(group.directory(), "grupo_a");
        assert!(group.owns_animal(11));
        assert!(group.owns_animal(20));
        assert!(!group.owns_animal(21));
    }
}
