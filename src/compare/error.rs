/// Errors that can occur when comparing files
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// No files were given, so there is nothing to aggregate
    #[error("Comparison requires at least one file")]
    EmptyInput,
}
