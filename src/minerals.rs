//! Mineral presets: the oxide scope and normalization targets of common
//! microprobe minerals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Analysis, AnalysisDataset};
use crate::error::CalcResult;
use crate::reference::OxideReferenceTable;
use crate::stoich::CationCheck;

/// Oxide scope and ideal formula of a mineral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralPreset {
    /// Mineral name
    #[serde(default)]
    pub name: String,
    /// Oxides in scope, in output order
    pub oxides: Vec<String>,
    /// Anions per formula unit
    pub afu: f64,
    /// Cations per formula unit
    pub cfu: f64,
}

const BUILTIN: [(&str, &[&str], f64, f64); 5] = [
    (
        "olivine",
        &["SiO2", "FeO", "Cr2O3", "MgO", "MnO", "NiO", "CaO"],
        4.0,
        3.0,
    ),
    (
        "feldspar",
        &["SiO2", "TiO2", "Al2O3", "FeO", "MgO", "CaO", "Na2O", "K2O"],
        32.0,
        20.0,
    ),
    (
        "clinopyroxene",
        &["SiO2", "TiO2", "Al2O3", "Cr2O3", "FeO", "MgO", "MnO", "CaO", "Na2O"],
        6.0,
        4.0,
    ),
    (
        "amphibole",
        &["SiO2", "TiO2", "Al2O3", "Cr2O3", "FeO", "MnO", "MgO", "CaO", "Na2O", "K2O"],
        23.0,
        15.0,
    ),
    (
        "spinel",
        &["TiO2", "Al2O3", "Cr2O3", "V2O3", "FeO", "MnO", "MgO", "NiO", "ZnO"],
        4.0,
        3.0,
    ),
];

fn canonical(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "ol" => "olivine".to_string(),
        "feld" | "plag" | "plagioclase" => "feldspar".to_string(),
        "cpx" => "clinopyroxene".to_string(),
        "amph" => "amphibole".to_string(),
        "sp" => "spinel".to_string(),
        other => other.to_string(),
    }
}

impl MineralPreset {
    /// Create a preset
    pub fn new(name: impl Into<String>, oxides: &[&str], afu: f64, cfu: f64) -> Self {
        Self {
            name: name.into(),
            oxides: oxides.iter().map(|s| s.to_string()).collect(),
            afu,
            cfu,
        }
    }

    /// Look up a built-in preset by name or short alias (`ol`, `cpx`, ...)
    pub fn builtin(name: &str) -> Option<Self> {
        let name = canonical(name);
        BUILTIN
            .iter()
            .find(|(n, _, _, _)| *n == name)
            .map(|(n, oxides, afu, cfu)| Self::new(*n, oxides, *afu, *cfu))
    }

    /// Every built-in preset
    pub fn all() -> Vec<Self> {
        BUILTIN
            .iter()
            .map(|(n, oxides, afu, cfu)| Self::new(*n, oxides, *afu, *cfu))
            .collect()
    }

    /// Cation-total screen for this mineral
    pub fn check(&self, wiggle: f64) -> CationCheck {
        CationCheck::new(self.cfu).with_wiggle(wiggle)
    }

    /// Build a dataset over this preset's oxide scope
    pub fn dataset(
        &self,
        table: &OxideReferenceTable,
        analyses: impl IntoIterator<Item = Analysis>,
    ) -> CalcResult<AnalysisDataset> {
        AnalysisDataset::new(table, &self.oxides, analyses)
    }
}

/// Built-in presets overlaid with user-defined ones
#[derive(Debug, Clone, Default)]
pub struct MineralRegistry {
    custom: BTreeMap<String, MineralPreset>,
}

impl MineralRegistry {
    /// Add or replace a preset
    pub fn insert(&mut self, mut preset: MineralPreset) {
        let key = canonical(&preset.name);
        preset.name = key.clone();
        self.custom.insert(key, preset);
    }

    /// Look up a preset; user-defined presets shadow built-in ones
    pub fn get(&self, name: &str) -> Option<MineralPreset> {
        self.custom
            .get(&canonical(name))
            .cloned()
            .or_else(|| MineralPreset::builtin(name))
    }

    /// Names of every available preset
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN.iter().map(|(n, _, _, _)| n.to_string()).collect();
        for name in self.custom.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_resolve() {
        let table = OxideReferenceTable::standard();
        for preset in MineralPreset::all() {
            assert!(table.resolve_all(&preset.oxides).is_ok(), "{}", preset.name);
            assert!(preset.afu > 0.0 && preset.cfu > 0.0);
        }
    }

    #[test]
    fn test_aliases() {
        let cpx = MineralPreset::builtin("cpx").unwrap();
        assert_eq!(cpx.name, "clinopyroxene");
        assert_eq!((cpx.afu, cpx.cfu), (6.0, 4.0));
        assert_eq!(MineralPreset::builtin("Olivine").unwrap().afu, 4.0);
        assert!(MineralPreset::builtin("garnet").is_none());
    }

    #[test]
    fn test_registry_overrides() {
        let mut registry = MineralRegistry::default();
        registry.insert(MineralPreset::new(
            "garnet",
            &["SiO2", "Al2O3", "FeO", "MgO", "CaO"],
            12.0,
            8.0,
        ));
        registry.insert(MineralPreset::new("OL", &["SiO2", "MgO"], 4.0, 3.0));

        assert_eq!(registry.get("garnet").unwrap().cfu, 8.0);
        assert_eq!(registry.get("olivine").unwrap().oxides.len(), 2);
        assert!(registry.names().contains(&"garnet".to_string()));
        assert_eq!(registry.names().len(), 6);
    }

    #[test]
    fn test_check_window() {
        let check = MineralPreset::builtin("feldspar").unwrap().check(0.01);
        assert!(check.accepts(20.15));
        assert!(!check.accepts(20.3));
    }
}
