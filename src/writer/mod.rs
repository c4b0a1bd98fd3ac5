//! # Table Output
//!
//! Writes any [`TabularOutput`](crate::table::TabularOutput) as CSV or
//! Parquet. The first column holds analysis identifiers; every other column is
//! a nullable `Float64` or a `Boolean` flag.
//!
//! Parquet files carry the run parameters as JSON in the footer key-value
//! metadata under `probecalc:parameters`, next to `probecalc:created` and
//! `probecalc:version`.
//!
//! ```no_run
//! use probecalc::prelude::*;
//! use probecalc::writer::{write_path, WriterConfig};
//!
//! let table = OxideReferenceTable::standard();
//! let analyses = vec![Analysis::new("fo").with("SiO2", 42.71).with("MgO", 57.29)];
//! let dataset = AnalysisDataset::new(&table, &["SiO2", "MgO"], analyses)?;
//! let formula = StoichiometryEngine::new(&table).cations(&dataset, 4.0, HeaderStyle::Cation)?;
//!
//! write_path("olivine.parquet", &formula, &WriterConfig::default(), &serde_json::json!({"afu": 4.0}))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod output;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{CompressionType, WriterConfig};
pub use error::WriterError;
pub use output::{
    footer_metadata, to_record_batch, write_csv, write_parquet, write_path, OutputFormat,
    CREATED_KEY, PARAMETERS_KEY, VERSION_KEY,
};
pub use stats::WriterStats;
