//! # Analysis Datasets
//!
//! An [`AnalysisDataset`] pairs a table of analyses (rows) by oxide weight
//! percents (columns) with the ordered list of oxides in scope for the current
//! mineral.
//!
//! ## Ownership
//!
//! Datasets are values. Stages that change oxide composition (Fe3+ estimation)
//! return a new dataset built with [`AnalysisDataset::with_column`], which
//! shares every untouched column with its parent:
//!
//! ```
//! use probecalc::dataset::{Analysis, AnalysisDataset};
//! use probecalc::reference::OxideReferenceTable;
//!
//! let table = OxideReferenceTable::standard();
//! let analyses = vec![Analysis::new("ol-1").with("SiO2", 40.8).with("FeO", 9.1).with("MgO", 49.6)];
//! let original = AnalysisDataset::new(&table, &["SiO2", "FeO", "MgO"], analyses)?;
//!
//! let derived = original.with_column(&table, "Fe2O3", vec![Some(0.5)])?;
//! assert!(derived.in_scope("Fe2O3"));
//! assert!(!original.in_scope("Fe2O3"));
//! assert!(derived.shares_column(&original, "SiO2"));
//! # Ok::<(), probecalc::error::CalcError>(())
//! ```

mod store;
mod types;


pub use store::{AnalysisDataset, OxideColumn};
pub use types::Analysis;
