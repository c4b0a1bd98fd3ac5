//! # Analysis Ingestion
//!
//! Reads analyses from delimited text: one row per analysis, one column per
//! oxide in weight percent, and optionally an identifier column.
//!
//! Cells matching a missing marker (`<`, `-`, `n.d.`, `bdl`, `NaN` or an
//! empty cell by default) become missing values. Any other cell that does not
//! parse as a number is an error naming its row and column.

mod error;
mod reader;

#[cfg(test)]
mod tests;

pub use error::IngestError;
pub use reader::{read_analyses, read_analyses_path, IngestOptions, DEFAULT_MISSING_MARKERS};
