use std::collections::BTreeSet;

use log::{debug, warn};

use super::formula::{CationCheck, CationFormula, HeaderStyle};
use crate::dataset::AnalysisDataset;
use crate::error::{CalcError, CalcResult};
use crate::reference::{OxideConstants, OxideReferenceTable};
use crate::table::{map_rows, ResultTable};

/// Converts oxide weight percents into molar, oxygen and cation proportions.
///
/// All operations are row-wise and pure. A missing measurement yields a
/// missing output in its own column and contributes nothing to row sums.
#[derive(Debug, Clone)]
pub struct StoichiometryEngine {
    table: OxideReferenceTable,
}

pub(crate) fn validate_target(name: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::configuration(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn scale(values: &[Option<f64>], factor: Option<f64>) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.zip(factor).map(|(v, f)| v * f))
        .collect()
}

fn nan_sum(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

impl StoichiometryEngine {
    /// Create an engine over a reference table
    pub fn new(table: &OxideReferenceTable) -> Self {
        Self {
            table: table.clone(),
        }
    }

    /// The reference table in use
    pub fn reference(&self) -> &OxideReferenceTable {
        &self.table
    }

    pub(crate) fn scope_constants<'a>(
        &'a self,
        dataset: &AnalysisDataset,
    ) -> CalcResult<Vec<&'a OxideConstants>> {
        self.table.resolve_all(dataset.scope())
    }

    fn headers(
        &self,
        constants: &[&OxideConstants],
        style: HeaderStyle,
    ) -> CalcResult<Vec<String>> {
        match style {
            HeaderStyle::Oxide => Ok(constants.iter().map(|c| c.symbol.clone()).collect()),
            HeaderStyle::Cation => {
                let mut seen = BTreeSet::new();
                for c in constants {
                    if !seen.insert(c.cation_label.as_str()) {
                        return Err(CalcError::configuration(format!(
                            "cation label '{}' is shared by more than one in-scope oxide",
                            c.cation_label
                        )));
                    }
                }
                Ok(constants.iter().map(|c| c.cation_label.clone()).collect())
            }
        }
    }

    /// Moles of each in-scope oxide per 100 g, for one analysis
    pub(crate) fn molar_row(
        constants: &[&OxideConstants],
        dataset: &AnalysisDataset,
        row: usize,
    ) -> Vec<Option<f64>> {
        constants
            .iter()
            .map(|c| dataset.value(row, &c.symbol).map(|wt| wt / c.molar_mass))
            .collect()
    }

    /// Oxygen proportions of one analysis
    pub(crate) fn oxygen_row(constants: &[&OxideConstants], molar: &[Option<f64>]) -> Vec<Option<f64>> {
        constants
            .iter()
            .zip(molar)
            .map(|(c, m)| m.map(|m| m * c.oxygen_count))
            .collect()
    }

    /// Cation proportions of one analysis
    pub(crate) fn cation_row(constants: &[&OxideConstants], molar: &[Option<f64>]) -> Vec<Option<f64>> {
        constants
            .iter()
            .zip(molar)
            .map(|(c, m)| m.map(|m| m * c.cation_count))
            .collect()
    }

    /// `afu / Σ oxygen`, or `None` when the analysis carries no oxygen at all
    pub(crate) fn orf(afu: f64, oxygens: &[Option<f64>]) -> Option<f64> {
        let total = nan_sum(oxygens);
        (total > 0.0).then(|| afu / total)
    }

    fn build(
        &self,
        dataset: &AnalysisDataset,
        headers: Vec<String>,
        row_fn: impl Fn(usize) -> Vec<Option<f64>> + Sync + Send,
    ) -> ResultTable {
        let rows = map_rows(dataset.len(), row_fn);
        ResultTable::from_parts(dataset.shared_ids(), headers, rows)
    }

    /// `molar_proportion = wt% / molar_mass` for every in-scope oxide
    pub fn molar_proportions(&self, dataset: &AnalysisDataset) -> CalcResult<ResultTable> {
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Oxide)?;
        Ok(self.build(dataset, headers, |row| {
            Self::molar_row(&constants, dataset, row)
        }))
    }

    /// `oxygen_proportion = molar_proportion * oxygens per oxide`
    pub fn oxygen_proportions(&self, dataset: &AnalysisDataset) -> CalcResult<ResultTable> {
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Oxide)?;
        Ok(self.build(dataset, headers, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            Self::oxygen_row(&constants, &molar)
        }))
    }

    /// Oxygen renormalization factor `afu / Σ oxygen_proportion` per analysis.
    ///
    /// `None` for analyses with no measured in-scope oxide.
    pub fn renormalization_factors(
        &self,
        dataset: &AnalysisDataset,
        afu: f64,
    ) -> CalcResult<Vec<Option<f64>>> {
        validate_target("anions per formula unit", afu)?;
        let constants = self.scope_constants(dataset)?;
        Ok(map_rows(dataset.len(), |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            Self::orf(afu, &Self::oxygen_row(&constants, &molar))
        }))
    }

    /// Anions per formula unit contributed by each oxide; each row sums to `afu`
    pub fn anion_counts(&self, dataset: &AnalysisDataset, afu: f64) -> CalcResult<ResultTable> {
        validate_target("anions per formula unit", afu)?;
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Oxide)?;
        Ok(self.build(dataset, headers, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            let oxygens = Self::oxygen_row(&constants, &molar);
            scale(&oxygens, Self::orf(afu, &oxygens))
        }))
    }

    /// Cations per formula unit normalized to `afu` anions.
    ///
    /// `cation = anion_count * cations per oxide / oxygens per oxide`.
    pub fn cations(
        &self,
        dataset: &AnalysisDataset,
        afu: f64,
        headers: HeaderStyle,
    ) -> CalcResult<CationFormula> {
        validate_target("anions per formula unit", afu)?;
        let constants = self.scope_constants(dataset)?;
        let header_names = self.headers(&constants, headers)?;
        debug!(
            "Calculating cations on {afu} anions for {} analyses",
            dataset.len()
        );

        let table = self.build(dataset, header_names, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            let oxygens = Self::oxygen_row(&constants, &molar);
            let factor = Self::orf(afu, &oxygens);
            constants
                .iter()
                .zip(scale(&oxygens, factor))
                .map(|(c, anions)| anions.map(|a| a * c.cations_per_oxygen()))
                .collect()
        });

        let empty = (0..table.len())
            .filter(|&row| table.row(row).iter().all(Option::is_none))
            .count();
        if empty > 0 {
            warn!("{empty} analyses have no measured in-scope oxides");
        }

        Ok(CationFormula::new(table, afu, headers))
    }

    /// Cations per formula unit on `afu` anions, screened against `check`
    pub fn check_cations(
        &self,
        dataset: &AnalysisDataset,
        afu: f64,
        check: &CationCheck,
    ) -> CalcResult<CationFormula> {
        check.validate()?;
        let formula = self.cations(dataset, afu, HeaderStyle::Cation)?;
        Ok(formula.with_check(check))
    }

    /// Cations normalized so that the cations not listed in `exclude` sum to
    /// `cfu`. Headers are cation labels.
    pub fn cation_basis(
        &self,
        dataset: &AnalysisDataset,
        cfu: f64,
        exclude: &[&str],
    ) -> CalcResult<CationFormula> {
        validate_target("cations per formula unit", cfu)?;
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Cation)?;

        let table = self.build(dataset, headers, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            let cations = Self::cation_row(&constants, &molar);
            let subset: f64 = constants
                .iter()
                .zip(&cations)
                .filter(|(c, _)| !exclude.contains(&c.cation_label.as_str()))
                .filter_map(|(_, v)| *v)
                .sum();
            let factor = (subset > 0.0).then(|| cfu / subset);
            scale(&cations, factor)
        });

        Ok(CationFormula::new(table, cfu, HeaderStyle::Cation))
    }

    /// Molar fraction of each in-scope oxide (liquid/glass compositions)
    pub fn mole_fractions(&self, dataset: &AnalysisDataset) -> CalcResult<ResultTable> {
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Oxide)?;
        Ok(self.build(dataset, headers, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            let total = nan_sum(&molar);
            scale(&molar, (total > 0.0).then(|| 1.0 / total))
        }))
    }

    /// Cation fraction of each in-scope oxide (liquid/glass compositions)
    pub fn cation_fractions(&self, dataset: &AnalysisDataset) -> CalcResult<ResultTable> {
        let constants = self.scope_constants(dataset)?;
        let headers = self.headers(&constants, HeaderStyle::Oxide)?;
        Ok(self.build(dataset, headers, |row| {
            let molar = Self::molar_row(&constants, dataset, row);
            let cations = Self::cation_row(&constants, &molar);
            let total = nan_sum(&cations);
            scale(&cations, (total > 0.0).then(|| 1.0 / total))
        }))
    }
}
