use std::collections::BTreeMap;

/// A single microprobe analysis: oxide symbol to weight percent.
///
/// Oxides that were not analysed or fell below detection are simply absent
/// (or `NaN`, which is treated the same way when the dataset is built).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Analysis identifier (sample name, spot label, row number)
    pub id: String,
    /// Oxide weight percents
    pub oxides: BTreeMap<String, f64>,
}

impl Analysis {
    /// Create an empty analysis
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            oxides: BTreeMap::new(),
        }
    }

    /// Builder-style setter for one oxide
    pub fn with(mut self, oxide: impl Into<String>, wt_percent: f64) -> Self {
        self.set(oxide, wt_percent);
        self
    }

    /// Set one oxide
    pub fn set(&mut self, oxide: impl Into<String>, wt_percent: f64) {
        self.oxides.insert(oxide.into(), wt_percent);
    }

    /// Measured weight percent, `None` when missing
    pub fn get(&self, oxide: &str) -> Option<f64> {
        self.oxides.get(oxide).copied().filter(|v| v.is_finite())
    }

    /// Analytical total over all measured oxides
    pub fn total(&self) -> f64 {
        self.oxides.values().filter(|v| v.is_finite()).sum()
    }
}
