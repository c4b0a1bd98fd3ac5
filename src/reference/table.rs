use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ReferenceError;
use crate::error::{CalcError, CalcResult};

/// Constants describing one oxide component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxideConstants {
    /// Oxide symbol, e.g. `Al2O3`
    #[serde(rename = "oxide")]
    pub symbol: String,
    /// Molar mass in g/mol
    pub molar_mass: f64,
    /// Cations per oxide formula unit
    pub cation_count: f64,
    /// Oxygens per oxide formula unit
    pub oxygen_count: f64,
    /// Label used for the cation column, e.g. `Al`, `Fe2`
    pub cation_label: String,
    /// Ideal cation charge; derived as `2 * oxygen / cation` when absent
    #[serde(default)]
    pub cation_charge: Option<f64>,
}

impl OxideConstants {
    /// Create constants with the charge derived from the formula
    pub fn new(
        symbol: impl Into<String>,
        molar_mass: f64,
        cation_count: f64,
        oxygen_count: f64,
        cation_label: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            molar_mass,
            cation_count,
            oxygen_count,
            cation_label: cation_label.into(),
            cation_charge: None,
        }
    }

    /// Ideal cation charge
    pub fn charge(&self) -> f64 {
        self.cation_charge
            .unwrap_or(2.0 * self.oxygen_count / self.cation_count)
    }

    /// Cations carried by one oxygen of this oxide
    pub fn cations_per_oxygen(&self) -> f64 {
        self.cation_count / self.oxygen_count
    }

    /// Oxygens carried by one cation of this oxide
    pub fn oxygens_per_cation(&self) -> f64 {
        self.oxygen_count / self.cation_count
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        let invalid = |reason: &str| ReferenceError::InvalidEntry {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };

        if self.symbol.trim().is_empty() {
            return Err(invalid("empty oxide symbol"));
        }
        if !(self.molar_mass.is_finite() && self.molar_mass > 0.0) {
            return Err(invalid("molar mass must be positive"));
        }
        if !(self.cation_count.is_finite() && self.cation_count > 0.0) {
            return Err(invalid("cation count must be positive"));
        }
        if !(self.oxygen_count.is_finite() && self.oxygen_count > 0.0) {
            return Err(invalid("oxygen count must be positive"));
        }
        if self.cation_label.trim().is_empty() {
            return Err(invalid("empty cation label"));
        }
        if let Some(charge) = self.cation_charge {
            if !(charge.is_finite() && charge > 0.0) {
                return Err(invalid("cation charge must be positive"));
            }
        }
        Ok(())
    }
}

/// Immutable lookup from oxide symbol to [`OxideConstants`].
///
/// The table is built once and shared by every stage. Cloning is cheap (the
/// entries live behind an `Arc`) and no stage can mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct OxideReferenceTable {
    pub(super) entries: Arc<BTreeMap<String, OxideConstants>>,
}

impl OxideReferenceTable {
    /// Build a table from a list of constants
    pub fn from_constants(
        constants: impl IntoIterator<Item = OxideConstants>,
    ) -> Result<Self, ReferenceError> {
        let mut entries = BTreeMap::new();
        for entry in constants {
            entry.validate()?;
            if entries.contains_key(&entry.symbol) {
                return Err(ReferenceError::Duplicate(entry.symbol));
            }
            entries.insert(entry.symbol.clone(), entry);
        }

        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    /// Parse a table from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse a table from CSV with the columns
    /// `oxide,molar_mass,cation_count,oxygen_count,cation_label[,cation_charge]`
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ReferenceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut constants = Vec::new();
        for record in csv_reader.deserialize::<OxideConstants>() {
            constants.push(record?);
        }

        Self::from_constants(constants)
    }

    /// Look up an oxide
    pub fn get(&self, symbol: &str) -> Option<&OxideConstants> {
        self.entries.get(symbol)
    }

    /// Look up an oxide, failing with a configuration error when it is absent
    pub fn resolve(&self, symbol: &str) -> CalcResult<&OxideConstants> {
        self.get(symbol).ok_or_else(|| {
            CalcError::configuration(format!(
                "oxide '{symbol}' is not in the reference table"
            ))
        })
    }

    /// Resolve every symbol in order
    pub fn resolve_all<S: AsRef<str>>(&self, symbols: &[S]) -> CalcResult<Vec<&OxideConstants>> {
        symbols.iter().map(|s| self.resolve(s.as_ref())).collect()
    }

    /// Whether the table contains an oxide
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Oxide symbols in sorted order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries in symbol order
    pub fn iter(&self) -> impl Iterator<Item = &OxideConstants> {
        self.entries.values()
    }

    /// Number of oxides in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oxide whose cation column carries `label`, if any
    pub fn oxide_for_cation(&self, label: &str) -> Option<&OxideConstants> {
        self.entries.values().find(|c| c.cation_label == label)
    }
}

impl Default for OxideReferenceTable {
    fn default() -> Self {
        Self::standard()
    }
}
