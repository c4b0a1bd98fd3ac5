use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::stoich::validate_target;

/// Tolerance on `|S/T - X/N|` before a Droop estimate is declared inconsistent
pub const CONSISTENCY_TOLERANCE: f64 = 1e-5;

/// Mass of Fe2O3 per unit mass of FeO carrying the same iron
pub const FEO_TO_FE2O3: f64 = 1.1113;

/// Parameters of one Droop (1987) charge-balance estimate.
///
/// The general form normalizes every in-scope cation. Site-restricted forms
/// leave some cations out of the cation sum and fix `afu`, the ideal subset
/// total and the constant `K`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroopConfig {
    /// Name reported in logs and output metadata
    pub name: String,
    /// Anions per formula unit (`X`)
    pub afu: f64,
    /// Ideal cation total of the normalized subset (`T`)
    pub cfu: f64,
    /// Normalizing constant `K` in `Fe3 = K (1 - T/S)`
    pub k: f64,
    /// Cation labels left out of the normalized subset
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl DroopConfig {
    /// General form: every cation counts and `K = 2 * afu`
    pub fn general(afu: f64, cfu: f64) -> Self {
        Self {
            name: "droop".to_string(),
            afu,
            cfu,
            k: 2.0 * afu,
            exclude: Vec::new(),
        }
    }

    fn amphibole(name: &str, cfu: f64, exclude: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            afu: 23.0,
            cfu,
            k: 46.0,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether a cation takes part in the normalized subset
    pub fn counts(&self, label: &str) -> bool {
        !self.exclude.iter().any(|e| e == label)
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        validate_target("anions per formula unit", self.afu)?;
        validate_target("ideal cation total", self.cfu)?;
        validate_target("Droop constant K", self.k)
    }
}

/// Site-restricted Droop configurations for amphiboles on 23 oxygens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmphiboleVariant {
    /// 13 cations excluding Ca, Na and K
    #[serde(rename = "13eCNK")]
    ThirteenECNK,
    /// 15 cations excluding Na and K
    #[serde(rename = "15eNK")]
    FifteenENK,
    /// 15 cations excluding K
    #[serde(rename = "15eK")]
    FifteenEK,
    /// Leake et al. (1997) recommended combination of the bounds above
    #[serde(rename = "leake1997")]
    Leake1997,
}

impl AmphiboleVariant {
    /// Droop parameters of this variant
    pub fn config(self) -> CalcResult<DroopConfig> {
        match self {
            AmphiboleVariant::ThirteenECNK => {
                Ok(DroopConfig::amphibole("amph-13eCNK", 13.0, &["Ca", "Na", "K"]))
            }
            AmphiboleVariant::FifteenENK => {
                Ok(DroopConfig::amphibole("amph-15eNK", 15.0, &["Na", "K"]))
            }
            AmphiboleVariant::FifteenEK => Ok(DroopConfig::amphibole("amph-15eK", 15.0, &["K"])),
            AmphiboleVariant::Leake1997 => Err(CalcError::not_yet_implemented(
                "Leake et al. (1997) combined amphibole Fe3+ estimate",
            )),
        }
    }
}

/// Fe3+ estimation method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Fe3Method {
    /// Droop (1987) general form
    Droop {
        /// Anions per formula unit
        afu: f64,
        /// Ideal cations per formula unit
        cfu: f64,
    },
    /// Site-restricted Droop configuration for amphiboles
    Amphibole {
        /// Which configuration
        variant: AmphiboleVariant,
    },
    /// Papike et al. (1974) clinopyroxene charge balance on 6 oxygens
    Papike,
    /// Stormer (1983) spinel charge balance on 3 cations
    Stormer,
}

impl fmt::Display for Fe3Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fe3Method::Droop { afu, cfu } => write!(f, "droop({afu} O, {cfu} cations)"),
            Fe3Method::Amphibole { variant } => match variant {
                AmphiboleVariant::ThirteenECNK => write!(f, "amph-13ecnk"),
                AmphiboleVariant::FifteenENK => write!(f, "amph-15enk"),
                AmphiboleVariant::FifteenEK => write!(f, "amph-15ek"),
                AmphiboleVariant::Leake1997 => write!(f, "amph-leake1997"),
            },
            Fe3Method::Papike => write!(f, "papike"),
            Fe3Method::Stormer => write!(f, "stormer"),
        }
    }
}

impl FromStr for AmphiboleVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches("amph-") {
            "13ecnk" => Ok(AmphiboleVariant::ThirteenECNK),
            "15enk" => Ok(AmphiboleVariant::FifteenENK),
            "15ek" => Ok(AmphiboleVariant::FifteenEK),
            "leake1997" => Ok(AmphiboleVariant::Leake1997),
            _ => Err(format!(
                "Unknown amphibole variant: {s}. Valid options: 13eCNK, 15eNK, 15eK, leake1997"
            )),
        }
    }
}
