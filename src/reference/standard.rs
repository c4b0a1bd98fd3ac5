use std::collections::BTreeMap;
use std::sync::Arc;

use super::{OxideConstants, OxideReferenceTable};

/// `(oxide, molar mass, cations, oxygens, cation label)` for the built-in table.
///
/// Molar masses from IUPAC 2013 standard atomic weights.
const STANDARD_OXIDES: &[(&str, f64, f64, f64, &str)] = &[
    ("SiO2", 60.0843, 1.0, 2.0, "Si"),
    ("TiO2", 79.8658, 1.0, 2.0, "Ti"),
    ("Al2O3", 101.9613, 2.0, 3.0, "Al"),
    ("Cr2O3", 151.9904, 2.0, 3.0, "Cr"),
    ("V2O3", 149.8812, 2.0, 3.0, "V"),
    ("Fe2O3", 159.6882, 2.0, 3.0, "Fe3"),
    ("FeO", 71.8444, 1.0, 1.0, "Fe2"),
    ("MnO", 70.9374, 1.0, 1.0, "Mn"),
    ("MgO", 40.3044, 1.0, 1.0, "Mg"),
    ("NiO", 74.6928, 1.0, 1.0, "Ni"),
    ("ZnO", 81.3794, 1.0, 1.0, "Zn"),
    ("CoO", 74.9326, 1.0, 1.0, "Co"),
    ("CaO", 56.0774, 1.0, 1.0, "Ca"),
    ("SrO", 103.6194, 1.0, 1.0, "Sr"),
    ("BaO", 153.3264, 1.0, 1.0, "Ba"),
    ("Na2O", 61.9789, 2.0, 1.0, "Na"),
    ("K2O", 94.1960, 2.0, 1.0, "K"),
    ("P2O5", 141.9445, 2.0, 5.0, "P"),
];

impl OxideReferenceTable {
    /// Built-in table of the oxides commonly reported by microprobe analyses
    pub fn standard() -> Self {
        let entries: BTreeMap<String, OxideConstants> = STANDARD_OXIDES
            .iter()
            .map(|&(symbol, molar_mass, cations, oxygens, label)| {
                (
                    symbol.to_string(),
                    OxideConstants::new(symbol, molar_mass, cations, oxygens, label),
                )
            })
            .collect();

        Self {
            entries: Arc::new(entries),
        }
    }
}
