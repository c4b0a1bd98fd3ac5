use crate::error::CalcError;

/// Errors that can occur while reading analyses
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error reading the input file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A column named in the options is not in the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell is neither a number nor a missing marker
    #[error("Invalid value '{value}' in column '{column}' at data row {row}")]
    InvalidValue {
        /// Data row, counting from 1 after the header
        row: usize,
        /// Column header
        column: String,
        /// Offending cell text
        value: String,
    },

    /// The parsed table does not form a valid dataset
    #[error("Dataset error: {0}")]
    Dataset(#[from] CalcError),
}
