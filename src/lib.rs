//! # probecalc - Stoichiometric Recalculation of Microprobe Analyses
//!
//! `probecalc` turns electron-microprobe oxide weight percents into mineral
//! formulas and the quantities petrologists derive from them.
//!
//! ## Pipeline
//!
//! 1. **Stoichiometry**: molar and oxygen proportions, the oxygen
//!    renormalization factor, and cations per formula unit on a chosen anion
//!    basis, with the cation-total screen (`cat_tot`, `cat_good`).
//! 2. **Fe3+ estimation**: the Droop (1987) charge-balance estimate of ferric
//!    iron from total iron reported as FeO, its site-restricted amphibole forms,
//!    and the Papike (pyroxene) and Stormer (spinel) charge balances. Each
//!    returns a new dataset with FeO replaced and Fe2O3 appended.
//! 3. **Site allocation**: a greedy fold of cations into ordered crystallographic
//!    sites with fixed capacities.
//! 4. **Endmembers**: ratio endmembers (olivine, feldspar, pyroxene quad),
//!    sequential pyroxene recipes and linear decompositions.
//!
//! Every stage is a pure function of its inputs. Missing measurements travel
//! through the pipeline as `None` and never raise errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use probecalc::prelude::*;
//!
//! let table = OxideReferenceTable::standard();
//! let analyses = vec![
//!     Analysis::new("fo-1").with("SiO2", 42.71).with("MgO", 57.29),
//! ];
//! let dataset = AnalysisDataset::new(&table, &["SiO2", "FeO", "MgO"], analyses)?;
//!
//! let formula = StoichiometryEngine::new(&table)
//!     .check_cations(&dataset, 4.0, &CationCheck::new(3.0))?;
//! assert!((formula.get_or_zero(0, "Si") - 1.0).abs() < 1e-3);
//! assert_eq!(formula.cat_good(0), Some(true));
//!
//! let endmembers = EndmemberCalc::Olivine.calculate(&formula)?;
//! assert!((endmembers.get(0, "Fo").unwrap_or(0.0) - 100.0).abs() < 1e-9);
//! # Ok::<(), probecalc::error::CalcError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`reference`]: oxide molar masses, cation/oxygen counts and cation labels
//! - [`dataset`]: analyses in column form with the oxide scope of a mineral
//! - [`stoich`]: cation formulas and normalizations
//! - [`ferric`]: Fe3+/Fe2+ estimators
//! - [`sites`]: crystallographic site allocation
//! - [`endmembers`]: endmember proportions
//! - [`minerals`]: oxide scope and formula basis presets
//! - [`quality`]: per-analysis data-quality report
//! - [`ingest`]: reading analyses from CSV
//! - [`writer`]: CSV and Parquet output
//!
//! ## Feature Flags
//!
//! - `colorized_output` (default): colored quality reports via `console`
//! - `parallel`: row-parallel recalculation via `rayon`; results are identical

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod endmembers;
pub mod error;
pub mod ferric;
pub mod ingest;
pub mod minerals;
pub mod quality;
pub mod reference;
pub mod sites;
pub mod stoich;
pub mod table;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{Analysis, AnalysisDataset};
    pub use crate::endmembers::{EndmemberCalc, EndmemberTable, LinearDecomposition};
    pub use crate::error::{CalcError, CalcResult};
    pub use crate::ferric::{
        AmphiboleVariant, DroopConfig, Fe3EstimationEngine, Fe3Estimate, Fe3Method,
    };
    pub use crate::ingest::{read_analyses, read_analyses_path, IngestError, IngestOptions};
    pub use crate::minerals::{MineralPreset, MineralRegistry};
    pub use crate::quality::{screen_cations, QualityReport, QualityScreen};
    pub use crate::reference::{OxideConstants, OxideReferenceTable, ReferenceError};
    pub use crate::sites::{Site, SiteAllocator, SiteAssignment, SiteScheme};
    pub use crate::stoich::{CationCheck, CationFormula, HeaderStyle, StoichiometryEngine};
    pub use crate::table::{ResultTable, TabularOutput};
    pub use crate::writer::{CompressionType, WriterConfig, WriterError, WriterStats};
}
