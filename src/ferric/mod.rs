//! # Fe3+ Estimation
//!
//! Microprobes report total iron as FeO. The estimators here infer how much of
//! it is ferric from charge balance and return a new dataset with `FeO`
//! reduced to the ferrous share and `Fe2O3` appended.
//!
//! ## Droop (1987)
//!
//! With all iron ferrous, `S` cations of the normalized subset sit on `X`
//! oxygens. The ideal subset total is `T`. Ferric iron per formula unit is
//!
//! ```text
//! Fe3 = K (1 - T / S)        K = 2X for the general form
//! ```
//!
//! clamped to `[0, Fe_total]` where `Fe_total` is iron on the `T`-cation basis.
//! The same molar proportions are normalized a second time to `T` cations,
//! giving `N` oxygens; `S/T` and `X/N` must agree within
//! [`CONSISTENCY_TOLERANCE`] or the whole batch fails.
//!
//! Amphibole variants ([`AmphiboleVariant`]) fix `X = 23`, `K = 46` and leave
//! some cations out of the subset.
//!
//! ## Charge balance on a fixed basis
//!
//! - Papike et al. (1974) for clinopyroxene on 6 oxygens
//! - Stormer (1983) for spinel on 3 cations
//!
//! ## Output
//!
//! `new_FeO = FeO * Fe2 / Fe_total` and
//! `new_Fe2O3 = FeO * (1 - Fe2 / Fe_total) * 1.1113`.

mod charge_balance;
mod config;
mod droop;
mod engine;
mod estimate;


pub use config::{AmphiboleVariant, DroopConfig, Fe3Method, CONSISTENCY_TOLERANCE, FEO_TO_FE2O3};
pub use engine::Fe3EstimationEngine;
pub use estimate::{Fe3Estimate, FE2O3, FEO};
