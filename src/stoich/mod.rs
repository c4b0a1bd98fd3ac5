//! # Stoichiometric Recalculation
//!
//! Converts oxide weight percents into a mineral formula expressed as cations
//! per formula unit.
//!
//! ## Steps
//!
//! 1. **Molar proportions**: `wt% / molar_mass` for every in-scope oxide.
//! 2. **Oxygen proportions**: molar proportion times oxygens per oxide.
//! 3. **Renormalization**: a per-analysis factor `afu / Σ oxygen` scales the
//!    oxygen proportions so they sum to the requested anions per formula unit.
//! 4. **Cations**: each anion count times cations per oxygen of its oxide.
//!
//! Missing measurements stay missing in their own column and count as zero in
//! every row sum. A [`CationCheck`] turns the cation total into the `cat_good`
//! screen; flagged analyses are kept.
//!
//! ```
//! use probecalc::dataset::{Analysis, AnalysisDataset};
//! use probecalc::reference::OxideReferenceTable;
//! use probecalc::stoich::{CationCheck, StoichiometryEngine};
//!
//! let table = OxideReferenceTable::standard();
//! let forsterite = Analysis::new("fo").with("SiO2", 42.71).with("MgO", 57.29);
//! let dataset = AnalysisDataset::new(&table, &["SiO2", "FeO", "MgO"], vec![forsterite])?;
//!
//! let formula = StoichiometryEngine::new(&table)
//!     .check_cations(&dataset, 4.0, &CationCheck::new(3.0))?;
//! assert!((formula.get_or_zero(0, "Mg") - 2.0).abs() < 1e-3);
//! assert_eq!(formula.cat_good(0), Some(true));
//! # Ok::<(), probecalc::error::CalcError>(())
//! ```

mod engine;
mod formula;


pub(crate) use engine::validate_target;
pub use engine::StoichiometryEngine;
pub use formula::{CationCheck, CationFormula, HeaderStyle, CAT_GOOD, CAT_TOT, DEFAULT_WIGGLE};
