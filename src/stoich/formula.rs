use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::table::{OutputColumn, ResultTable, TabularOutput};

/// Default acceptance window either side of the ideal cation total
pub const DEFAULT_WIGGLE: f64 = 0.005;

/// Column header for the cation total
pub const CAT_TOT: &str = "cat_tot";

/// Column header for the cation-total screen
pub const CAT_GOOD: &str = "cat_good";

/// Labels for cation-formula columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Cation labels (`Si`, `Fe2`, ...); required by site allocation and endmembers
    #[default]
    Cation,
    /// Oxide symbols (`SiO2`, `FeO`, ...); keeps log-ratio work in oxide space
    Oxide,
}

/// Acceptance window for the cation total of a formula.
///
/// `cat_good = cfu * (1 - wiggle) <= cat_tot <= cfu * (1 + wiggle)`. This is a
/// data-quality screen; flagged rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CationCheck {
    /// Ideal cations per formula unit
    pub cfu: f64,
    /// Fractional tolerance either side of `cfu`
    pub wiggle: f64,
}

impl CationCheck {
    /// Window around `cfu` with the default wiggle
    pub fn new(cfu: f64) -> Self {
        Self {
            cfu,
            wiggle: DEFAULT_WIGGLE,
        }
    }

    /// Replace the wiggle
    pub fn with_wiggle(mut self, wiggle: f64) -> Self {
        self.wiggle = wiggle;
        self
    }

    /// Lower and upper accepted totals
    pub fn bounds(&self) -> (f64, f64) {
        (self.cfu * (1.0 - self.wiggle), self.cfu * (1.0 + self.wiggle))
    }

    /// Whether a cation total passes
    pub fn accepts(&self, cat_tot: f64) -> bool {
        let (lower, upper) = self.bounds();
        cat_tot >= lower && cat_tot <= upper
    }

    /// Reject a non-positive `cfu` or a negative or non-finite wiggle
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.cfu.is_finite() && self.cfu > 0.0) {
            return Err(CalcError::configuration(format!(
                "ideal cations per formula unit must be positive, got {}",
                self.cfu
            )));
        }
        if !(self.wiggle.is_finite() && self.wiggle >= 0.0) {
            return Err(CalcError::configuration(format!(
                "wiggle must be non-negative, got {}",
                self.wiggle
            )));
        }
        Ok(())
    }
}

/// Cations per formula unit for every analysis, with totals and the optional
/// cation-total screen
#[derive(Debug, Clone, PartialEq)]
pub struct CationFormula {
    cations: ResultTable,
    totals: Vec<f64>,
    good: Option<Vec<bool>>,
    basis: f64,
    headers: HeaderStyle,
}

impl CationFormula {
    pub(crate) fn new(cations: ResultTable, basis: f64, headers: HeaderStyle) -> Self {
        let totals = (0..cations.len()).map(|row| cations.row_sum(row)).collect();
        Self {
            cations,
            totals,
            good: None,
            basis,
            headers,
        }
    }

    /// Attach the cation-total screen
    pub fn with_check(mut self, check: &CationCheck) -> Self {
        self.good = Some(self.totals.iter().map(|&t| check.accepts(t)).collect());
        self
    }

    /// Cation table (one column per in-scope oxide)
    pub fn table(&self) -> &ResultTable {
        &self.cations
    }

    /// Consume into the cation table
    pub fn into_table(self) -> ResultTable {
        self.cations
    }

    /// Number of analyses
    pub fn len(&self) -> usize {
        self.cations.len()
    }

    /// Whether there are no analyses
    pub fn is_empty(&self) -> bool {
        self.cations.is_empty()
    }

    /// Analysis identifiers
    pub fn ids(&self) -> &[String] {
        self.cations.ids()
    }

    /// Cations of one species in one analysis
    pub fn get(&self, row: usize, label: &str) -> Option<f64> {
        self.cations.get(row, label)
    }

    /// Cations of one species with missing treated as zero
    pub fn get_or_zero(&self, row: usize, label: &str) -> f64 {
        self.cations.get_or_zero(row, label)
    }

    /// Cation total of one analysis (`cat_tot`)
    pub fn cat_tot(&self, row: usize) -> f64 {
        self.totals[row]
    }

    /// Cation totals of every analysis
    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    /// Screen result of one analysis (`cat_good`), if a check was applied
    pub fn cat_good(&self, row: usize) -> Option<bool> {
        self.good.as_ref().map(|g| g[row])
    }

    /// Screen results, if a check was applied
    pub fn flags(&self) -> Option<&[bool]> {
        self.good.as_deref()
    }

    /// Normalization target: anions per formula unit, or cations for a
    /// cation-basis formula
    pub fn basis(&self) -> f64 {
        self.basis
    }

    /// Header style of the cation table
    pub fn headers(&self) -> HeaderStyle {
        self.headers
    }
}

impl TabularOutput for CationFormula {
    fn row_ids(&self) -> &[String] {
        self.cations.ids()
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        let mut columns = self.cations.output_columns();
        columns.push(OutputColumn::float(
            CAT_TOT,
            self.totals.iter().map(|&t| Some(t)).collect(),
        ));
        if let Some(good) = &self.good {
            columns.push(OutputColumn::flag(CAT_GOOD, good.clone()));
        }
        columns
    }
}
