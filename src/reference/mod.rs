//! # Oxide Reference Table
//!
//! Immutable lookup from oxide symbol to molar mass, cation and oxygen counts,
//! cation label and ideal charge. Every recalculation stage takes the table
//! explicitly; nothing in the crate holds process-wide oxide state.
//!
//! ## CSV Format
//!
//! ```text
//! oxide,molar_mass,cation_count,oxygen_count,cation_label,cation_charge
//! SiO2,60.0843,1,2,Si,
//! FeO,71.8444,1,1,Fe2,
//! ```
//!
//! `cation_charge` may be omitted; it is derived as `2 * oxygen / cation`.

mod error;
mod standard;
mod table;

#[cfg(test)]
mod tests;

pub use error::ReferenceError;
pub use table::{OxideConstants, OxideReferenceTable};
