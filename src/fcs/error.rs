/// Errors that can occur while reading or writing FCS files
#[derive(Debug, thiserror::Error)]
pub enum FcsError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The HEADER segment is truncated or malformed
    #[error("Invalid FCS header: {0}")]
    InvalidHeader(String),

    /// The TEXT segment could not be split into keyword/value pairs
    #[error("Invalid TEXT segment: {0}")]
    InvalidText(String),

    /// A keyword required by the requested operation is absent
    #[error("Missing required keyword: {0}")]
    MissingKeyword(String),

    /// A keyword is present but its value cannot be interpreted
    #[error("Invalid value for keyword {keyword}: {value:?}")]
    InvalidKeyword {
        /// Normalized keyword name
        keyword: String,
        /// Raw value found in the TEXT segment
        value: String,
    },

    /// The DATA segment is inconsistent with the TEXT keywords
    #[error("Invalid DATA segment: {0}")]
    InvalidData(String),

    /// The file uses a data layout this reader does not decode
    #[error("Unsupported data layout: {0}")]
    Unsupported(String),
}
