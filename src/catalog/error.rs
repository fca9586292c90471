/// Errors that can occur while reading or writing the catalog database
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// I/O error preparing the database location
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Assay name outside the known set
    #[error("Unknown assay: {0}")]
    UnknownAssay(String),

    /// Group name not present in the catalog
    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}
