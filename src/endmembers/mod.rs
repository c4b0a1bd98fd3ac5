//! # Endmember Calculators
//!
//! Mineral-specific endmember proportions computed from a cation formula with
//! cation-label headers.
//!
//! - **Ratio sets** (olivine, feldspar, clinopyroxene quadrilateral): closed
//!   molar percentages `100 * cation / Σ cations`, missing cations counted as
//!   zero. Complete rows sum to 100.
//! - **Putirka (2008)**: sequential clinopyroxene components built on the
//!   tetrahedral-site allocation.
//! - **Dietrich & Petrakakis (1996)**: eleven clinopyroxene components from an
//!   eleven-entry site-occupancy vector through a [`LinearDecomposition`].
//! - **Spinel** (Ferracutti et al. 2014): not yet implemented.

mod cpx;
mod decomposition;
mod ratio;
mod table;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::stoich::{CationFormula, HeaderStyle};

pub use cpx::{dietrich_decomposition, DIETRICH_COMPONENTS, DIETRICH_ENDMEMBERS};
pub use decomposition::LinearDecomposition;
pub use table::EndmemberTable;

/// Endmember calculation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndmemberCalc {
    /// Fo, Fay, Teph, Mont
    Olivine,
    /// An, Ab, Or
    Feldspar,
    /// Fs, En, Wo
    CpxQuad,
    /// Putirka (2008) components
    CpxPutirka,
    /// Dietrich & Petrakakis (1996) components
    CpxDietrich,
    /// Ferracutti et al. (2014) spinel endmembers
    Spinel,
}

impl EndmemberCalc {
    /// Calculate endmembers from a cation formula
    pub fn calculate(self, formula: &CationFormula) -> CalcResult<EndmemberTable> {
        if formula.headers() != HeaderStyle::Cation {
            return Err(CalcError::input(
                "endmember calculations need a cation formula with cation-label headers",
            ));
        }
        debug!("Calculating {self} endmembers for {} analyses", formula.len());

        match self {
            EndmemberCalc::Olivine => Ok(ratio::OLIVINE.calculate(formula)),
            EndmemberCalc::Feldspar => Ok(ratio::FELDSPAR.calculate(formula)),
            EndmemberCalc::CpxQuad => Ok(ratio::CPX_QUAD.calculate(formula)),
            EndmemberCalc::CpxPutirka => cpx::putirka(formula),
            EndmemberCalc::CpxDietrich => cpx::dietrich(formula),
            EndmemberCalc::Spinel => Err(CalcError::not_yet_implemented(
                "spinel endmembers after Ferracutti et al. (2014)",
            )),
        }
    }

    /// Name of the mineral preset the method expects its formula from
    pub fn mineral(self) -> &'static str {
        match self {
            EndmemberCalc::Olivine => "olivine",
            EndmemberCalc::Feldspar => "feldspar",
            EndmemberCalc::CpxQuad | EndmemberCalc::CpxPutirka | EndmemberCalc::CpxDietrich => {
                "clinopyroxene"
            }
            EndmemberCalc::Spinel => "spinel",
        }
    }
}

impl fmt::Display for EndmemberCalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndmemberCalc::Olivine => "olivine",
            EndmemberCalc::Feldspar => "feldspar",
            EndmemberCalc::CpxQuad => "cpx-quad",
            EndmemberCalc::CpxPutirka => "cpx-putirka",
            EndmemberCalc::CpxDietrich => "cpx-dietrich",
            EndmemberCalc::Spinel => "spinel",
        };
        write!(f, "{name}")
    }
}

impl FromStr for EndmemberCalc {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "olivine" | "ol" => Ok(EndmemberCalc::Olivine),
            "feldspar" | "feld" => Ok(EndmemberCalc::Feldspar),
            "cpx-quad" => Ok(EndmemberCalc::CpxQuad),
            "cpx-putirka" => Ok(EndmemberCalc::CpxPutirka),
            "cpx-dietrich" => Ok(EndmemberCalc::CpxDietrich),
            "spinel" | "sp" => Ok(EndmemberCalc::Spinel),
            _ => Err(format!(
                "Unknown endmember calculation: {s}. Valid options: olivine, feldspar, cpx-quad, cpx-putirka, cpx-dietrich, spinel"
            )),
        }
    }
}
