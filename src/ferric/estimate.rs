use log::warn;

use super::config::FEO_TO_FE2O3;
use crate::dataset::AnalysisDataset;
use crate::error::CalcResult;
use crate::reference::OxideReferenceTable;
use crate::table::{OutputColumn, ResultTable, TabularOutput};

/// Oxide replaced by the split
pub const FEO: &str = "FeO";
/// Oxide appended by the split
pub const FE2O3: &str = "Fe2O3";

/// Ferric/ferrous split of one analysis, in cations per formula unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FerricSplit {
    pub fe_total: f64,
    pub fe3_ideal: f64,
}

impl FerricSplit {
    /// Fe3 clamped to `[0, fe_total]`
    pub fn fe3(&self) -> f64 {
        self.fe3_ideal.max(0.0).min(self.fe_total.max(0.0))
    }

    pub fn fe2(&self) -> f64 {
        self.fe_total - self.fe3()
    }

    /// `Fe2 / (Fe2 + Fe3)`; 1 for an iron-free analysis
    pub fn fe2_fraction(&self) -> f64 {
        if self.fe_total > 0.0 {
            self.fe2() / self.fe_total
        } else {
            1.0
        }
    }

    pub fn is_capped(&self) -> bool {
        self.fe3_ideal > self.fe_total
    }
}

/// Result of an Fe3+ estimate: the derived dataset and per-analysis diagnostics.
///
/// The derived dataset has `FeO` replaced by the ferrous share of the original
/// total iron and `Fe2O3` appended to the scope. Every other column is shared
/// with the input dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Fe3Estimate {
    method: String,
    dataset: AnalysisDataset,
    diagnostics: ResultTable,
}

impl Fe3Estimate {
    /// Name of the estimator that produced this result
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Dataset with `FeO` and `Fe2O3` split
    pub fn dataset(&self) -> &AnalysisDataset {
        &self.dataset
    }

    /// Consume into the derived dataset
    pub fn into_dataset(self) -> AnalysisDataset {
        self.dataset
    }

    /// Per-analysis diagnostics (`fe_total`, `fe3_ideal`, `fe3`, `fe2`,
    /// `fe2_fraction`, plus method-specific columns)
    pub fn diagnostics(&self) -> &ResultTable {
        &self.diagnostics
    }

    /// Clamped Fe3+ cations of one analysis, `None` if undefined
    pub fn fe3(&self, row: usize) -> Option<f64> {
        self.diagnostics.get(row, "fe3")
    }

    /// Fe2+ cations of one analysis, `None` if undefined
    pub fn fe2(&self, row: usize) -> Option<f64> {
        self.diagnostics.get(row, "fe2")
    }
}

impl TabularOutput for Fe3Estimate {
    fn row_ids(&self) -> &[String] {
        self.dataset.ids()
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        let mut columns: Vec<OutputColumn> = self
            .dataset
            .scope()
            .iter()
            .map(|oxide| {
                let values = self.dataset.column(oxide).map(<[_]>::to_vec);
                OutputColumn::float(oxide.clone(), values.unwrap_or_default())
            })
            .collect();
        columns.extend(self.diagnostics.output_columns());
        columns
    }
}

/// Per-row diagnostics in addition to the split itself
pub(crate) type ExtraColumns = (Vec<String>, Vec<Vec<Option<f64>>>);

/// Apply per-analysis splits to `dataset`.
///
/// Rows without a split (no measured oxides) and rows without FeO keep FeO as is
/// and get a missing Fe2O3.
pub(crate) fn apply_split(
    method: &str,
    table: &OxideReferenceTable,
    dataset: &AnalysisDataset,
    splits: &[Option<FerricSplit>],
    extra: ExtraColumns,
) -> CalcResult<Fe3Estimate> {
    let mut new_feo = Vec::with_capacity(dataset.len());
    let mut new_fe2o3 = Vec::with_capacity(dataset.len());
    let mut capped = 0usize;

    for (row, split) in splits.iter().enumerate() {
        let feo = dataset.value(row, FEO);
        match (feo, split) {
            (Some(feo), Some(split)) => {
                let fraction = split.fe2_fraction();
                new_feo.push(Some(feo * fraction));
                new_fe2o3.push(Some(feo * (1.0 - fraction) * FEO_TO_FE2O3));
                if split.is_capped() {
                    capped += 1;
                }
            }
            _ => {
                new_feo.push(feo);
                new_fe2o3.push(None);
            }
        }
    }

    if capped > 0 {
        warn!("{method}: Fe3+ estimate exceeds total iron in {capped} analyses; capped at total iron");
    }

    let derived = dataset
        .with_column(table, FEO, new_feo)?
        .with_column(table, FE2O3, new_fe2o3)?;

    let (mut names, extra_rows) = extra;
    names.extend(
        ["fe_total", "fe3_ideal", "fe3", "fe2", "fe2_fraction"]
            .iter()
            .map(|s| s.to_string()),
    );
    let rows = splits
        .iter()
        .zip(extra_rows)
        .map(|(split, mut row)| {
            match split {
                Some(s) => row.extend([
                    Some(s.fe_total),
                    Some(s.fe3_ideal),
                    Some(s.fe3()),
                    Some(s.fe2()),
                    Some(s.fe2_fraction()),
                ]),
                None => row.extend([None; 5]),
            }
            row
        })
        .collect();
    let diagnostics = ResultTable::new(dataset.shared_ids(), names, rows)?;

    Ok(Fe3Estimate {
        method: method.to_string(),
        dataset: derived,
        diagnostics,
    })
}
