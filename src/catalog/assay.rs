use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Assay types tracked by the catalog. Each has its own detail table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assay {
    /// Agonist stimulation
    Agonistas,
    /// Cryptococcus challenge
    Cryptococcus,
    /// Phagocytosis
    Fagocitose,
    /// Immunophenotyping
    Imunofenotipagem,
}

impl Assay {
    /// Every assay, in catalog order
    pub const ALL: [Assay; 4] = [
        Assay::Agonistas,
        Assay::Cryptococcus,
        Assay::Fagocitose,
        Assay::Imunofenotipagem,
    ];

    /// Name stored in `experimentos_master.tipo_ensaio` and used as directory name
    pub fn name(&self) -> &'static str {
        match self {
            Assay::Agonistas => "agonistas",
            Assay::Cryptococcus => "cryptococcus",
            Assay::Fagocitose => "fagocitose",
            Assay::Imunofenotipagem => "imunofenotipagem",
        }
    }

    /// Detail table holding this assay's result files
    pub fn detail_table(&self) -> &'static str {
        match self {
            Assay::Agonistas => "detalhes_agonistas",
            Assay::Cryptococcus => "detalhes_cryptococcus",
            Assay::Fagocitose => "detalhes_fagocitose",
            Assay::Imunofenotipagem => "detalhes_imunofenotipagem",
        }
    }

    /// Primary key column of the detail table
    pub fn detail_key(&self) -> &'static str {
        match self {
            Assay::Agonistas => "id_agonista",
            Assay::Cryptococcus => "id_cryptococcus",
            Assay::Fagocitose => "id_fagocitose",
            Assay::Imunofenotipagem => "id_imunofenotipagem",
        }
    }
}

impl FromStr for Assay {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Assay::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| CatalogError::UnknownAssay(s.to_string()))
    }
}

impl fmt::Display for Assay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
