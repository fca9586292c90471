use crate::catalog::CatalogError;

/// Errors that can occur while scanning the data tree or loading the catalog
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// I/O error walking the data tree or opening the mapping file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed mapping CSV
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Catalog write failed
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),
}
