/// Errors that can occur while building an oxide reference table
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// I/O error reading a reference file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// An entry has a non-physical constant (non-positive mass or count, empty label)
    #[error("Invalid entry for oxide '{symbol}': {reason}")]
    InvalidEntry {
        /// Oxide symbol of the offending entry
        symbol: String,
        /// Why the entry was rejected
        reason: String,
    },

    /// The same oxide symbol appears twice
    #[error("Duplicate oxide symbol: {0}")]
    Duplicate(String),
}
