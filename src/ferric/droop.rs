use super::config::{DroopConfig, CONSISTENCY_TOLERANCE};
use super::estimate::FerricSplit;
use crate::dataset::AnalysisDataset;
use crate::error::{CalcError, CalcResult};
use crate::reference::OxideConstants;
use crate::stoich::StoichiometryEngine;

/// The four quantities of Droop (1987) for one analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DroopBases {
    /// Cation total of the subset on `X` oxygens, all iron ferrous
    pub s: f64,
    /// Cation total of the subset normalized to the ideal cation total
    pub t: f64,
    /// Oxygen total on the anion basis
    pub x: f64,
    /// Oxygen total when the subset is normalized to `T` cations
    pub n: f64,
}

impl DroopBases {
    pub fn row(&self) -> Vec<Option<f64>> {
        vec![Some(self.s), Some(self.t), Some(self.x), Some(self.n)]
    }
}

pub(crate) const DROOP_COLUMNS: [&str; 4] = ["S", "T", "X", "N"];

/// Compare `S/T` with `X/N`; they differ only through an arithmetic or
/// configuration defect.
pub(crate) fn check_consistency(bases: &DroopBases, row: usize, id: &str) -> CalcResult<()> {
    let s_over_t = bases.s / bases.t;
    let x_over_n = bases.x / bases.n;
    if (s_over_t - x_over_n).abs() <= CONSISTENCY_TOLERANCE {
        Ok(())
    } else {
        Err(CalcError::Consistency {
            row,
            id: id.to_string(),
            s_over_t,
            x_over_n,
        })
    }
}

/// Droop estimate for one analysis.
///
/// `Ok(None)` when the analysis has no measured oxygen or no cations in the
/// normalized subset.
pub(crate) fn droop_row(
    config: &DroopConfig,
    constants: &[&OxideConstants],
    iron: usize,
    dataset: &AnalysisDataset,
    row: usize,
) -> CalcResult<Option<(DroopBases, FerricSplit)>> {
    let molar = StoichiometryEngine::molar_row(constants, dataset, row);
    let oxygens = StoichiometryEngine::oxygen_row(constants, &molar);
    let cations = StoichiometryEngine::cation_row(constants, &molar);

    let oxygen_total: f64 = oxygens.iter().flatten().sum();
    let subset_total: f64 = constants
        .iter()
        .zip(&cations)
        .filter(|(c, _)| config.counts(&c.cation_label))
        .filter_map(|(_, v)| *v)
        .sum();
    if oxygen_total <= 0.0 || subset_total <= 0.0 {
        return Ok(None);
    }

    let oxygen_basis = config.afu / oxygen_total;
    let cation_basis = config.cfu / subset_total;

    // Cations renormalized both ways, per oxide
    let on_oxygens: Vec<Option<f64>> = cations.iter().map(|v| v.map(|v| v * oxygen_basis)).collect();
    let on_cations: Vec<Option<f64>> = cations.iter().map(|v| v.map(|v| v * cation_basis)).collect();

    let subset_sum = |values: &[Option<f64>]| -> f64 {
        constants
            .iter()
            .zip(values)
            .filter(|(c, _)| config.counts(&c.cation_label))
            .filter_map(|(_, v)| *v)
            .sum()
    };
    let anion_sum = |values: &[Option<f64>]| -> f64 {
        constants
            .iter()
            .zip(values)
            .filter_map(|(c, v)| v.map(|v| v * c.oxygens_per_cation()))
            .sum()
    };

    let bases = DroopBases {
        s: subset_sum(&on_oxygens),
        t: subset_sum(&on_cations),
        x: anion_sum(&on_oxygens),
        n: anion_sum(&on_cations),
    };
    check_consistency(&bases, row, dataset.id(row))?;

    let split = FerricSplit {
        fe_total: on_cations[iron].unwrap_or(0.0),
        fe3_ideal: config.k * (1.0 - bases.t / bases.s),
    };
    Ok(Some((bases, split)))
}
