/// Errors that can occur while writing result tables
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library during file writing
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error writing CSV records
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing run parameters
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The table cannot be written as given
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
