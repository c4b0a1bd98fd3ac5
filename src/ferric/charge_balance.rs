//! Single-site charge-balance estimators

use super::estimate::FerricSplit;
use crate::dataset::AnalysisDataset;
use crate::reference::OxideConstants;
use crate::stoich::StoichiometryEngine;

fn label_sum(constants: &[&OxideConstants], cations: &[Option<f64>], label: &str) -> f64 {
    constants
        .iter()
        .zip(cations)
        .filter(|(c, _)| c.cation_label == label)
        .filter_map(|(_, v)| *v)
        .sum()
}

/// Papike et al. (1974): clinopyroxene on 6 oxygens.
///
/// `Fe3 = Na + Al_IV - Al_VI - 2 Ti - Cr` with `Al_IV = min(Al, 2 - Si)`.
pub(crate) fn papike_row(
    constants: &[&OxideConstants],
    iron: usize,
    dataset: &AnalysisDataset,
    row: usize,
) -> Option<FerricSplit> {
    let molar = StoichiometryEngine::molar_row(constants, dataset, row);
    let oxygens = StoichiometryEngine::oxygen_row(constants, &molar);
    let factor = StoichiometryEngine::orf(6.0, &oxygens)?;
    let cations: Vec<Option<f64>> = StoichiometryEngine::cation_row(constants, &molar)
        .into_iter()
        .map(|v| v.map(|v| v * factor))
        .collect();

    let get = |label: &str| label_sum(constants, &cations, label);
    let al = get("Al");
    let al_iv = al.min((2.0 - get("Si")).max(0.0));
    let al_vi = al - al_iv;

    Some(FerricSplit {
        fe_total: cations[iron].unwrap_or(0.0),
        fe3_ideal: get("Na") + al_iv - al_vi - 2.0 * get("Ti") - get("Cr"),
    })
}

/// Stormer (1983): spinel on the 3-cation basis.
///
/// Cations are normalized so that every in-scope cation sums to 3, not to
/// 4 oxygens, so that the 8 positive charges of the ideal `AB2O4` formula are
/// fixed: `Fe3 = 8 - Σ charge(non-Fe) - 2 Fe_total`. An oxygen-normalized
/// formula gives a different estimate for analyses that are not already
/// stoichiometric.
pub(crate) fn stormer_row(
    constants: &[&OxideConstants],
    iron: usize,
    dataset: &AnalysisDataset,
    row: usize,
) -> Option<FerricSplit> {
    let molar = StoichiometryEngine::molar_row(constants, dataset, row);
    let raw = StoichiometryEngine::cation_row(constants, &molar);
    let total: f64 = raw.iter().flatten().sum();
    if total <= 0.0 {
        return None;
    }
    let factor = 3.0 / total;

    let other_charge: f64 = constants
        .iter()
        .zip(&raw)
        .enumerate()
        .filter(|(i, _)| *i != iron)
        .filter_map(|(_, (c, v))| v.map(|v| v * factor * c.charge()))
        .sum();
    let fe_total = raw[iron].unwrap_or(0.0) * factor;

    Some(FerricSplit {
        fe_total,
        fe3_ideal: 8.0 - other_charge - 2.0 * fe_total,
    })
}
