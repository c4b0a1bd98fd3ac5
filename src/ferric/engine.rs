use log::{debug, info};

use super::charge_balance::{papike_row, stormer_row};
use super::config::{AmphiboleVariant, DroopConfig, Fe3Method};
use super::droop::{droop_row, DROOP_COLUMNS};
use super::estimate::{apply_split, Fe3Estimate, FerricSplit, FE2O3, FEO};
use crate::dataset::AnalysisDataset;
use crate::error::{CalcError, CalcResult};
use crate::reference::{OxideConstants, OxideReferenceTable};
use crate::table::{map_rows, try_map_rows};

/// Estimates the ferric/ferrous split of total iron reported as FeO
#[derive(Debug, Clone)]
pub struct Fe3EstimationEngine {
    table: OxideReferenceTable,
}

impl Fe3EstimationEngine {
    /// Create an engine over a reference table
    pub fn new(table: &OxideReferenceTable) -> Self {
        Self {
            table: table.clone(),
        }
    }

    /// Run any estimator
    pub fn estimate(&self, dataset: &AnalysisDataset, method: &Fe3Method) -> CalcResult<Fe3Estimate> {
        match method {
            Fe3Method::Droop { afu, cfu } => self.droop(dataset, &DroopConfig::general(*afu, *cfu)),
            Fe3Method::Amphibole { variant } => self.amphibole(dataset, *variant),
            Fe3Method::Papike => self.papike(dataset),
            Fe3Method::Stormer => self.stormer(dataset),
        }
    }

    /// Check the iron columns, returning the in-scope constants and the
    /// position of FeO among them
    fn prepare<'a>(&'a self, dataset: &AnalysisDataset) -> CalcResult<(Vec<&'a OxideConstants>, usize)> {
        if !dataset.in_scope(FEO) {
            return Err(CalcError::input(
                "Fe3+ estimation needs total iron as FeO in the oxide scope",
            ));
        }
        if dataset.in_scope(FE2O3) {
            return Err(CalcError::input(
                "Fe3+ estimation needs a dataset without Fe2O3 in the oxide scope",
            ));
        }
        self.table.resolve(FE2O3)?;

        let constants = self.table.resolve_all(dataset.scope())?;
        let iron = constants
            .iter()
            .position(|c| c.symbol == FEO)
            .ok_or_else(|| CalcError::input("FeO is not in the oxide scope"))?;
        Ok((constants, iron))
    }

    /// Droop (1987) charge-balance estimate.
    ///
    /// Fails with [`CalcError::Consistency`] for the whole batch if any
    /// analysis violates `S/T = X/N`.
    pub fn droop(&self, dataset: &AnalysisDataset, config: &DroopConfig) -> CalcResult<Fe3Estimate> {
        config.validate()?;
        let (constants, iron) = self.prepare(dataset)?;
        debug!(
            "{}: X = {}, T = {}, K = {}, excluding {:?}",
            config.name, config.afu, config.cfu, config.k, config.exclude
        );

        let results = try_map_rows(dataset.len(), |row| {
            droop_row(config, &constants, iron, dataset, row)
        })?;

        let (splits, extra_rows): (Vec<Option<FerricSplit>>, Vec<Vec<Option<f64>>>) = results
            .into_iter()
            .map(|r| match r {
                Some((bases, split)) => (Some(split), bases.row()),
                None => (None, vec![None; DROOP_COLUMNS.len()]),
            })
            .unzip();

        let extra = (DROOP_COLUMNS.iter().map(|s| s.to_string()).collect(), extra_rows);
        let estimate = apply_split(&config.name, &self.table, dataset, &splits, extra)?;
        info!("{}: estimated Fe3+ for {} analyses", config.name, dataset.len());
        Ok(estimate)
    }

    /// Site-restricted Droop estimate for amphiboles on 23 oxygens
    pub fn amphibole(&self, dataset: &AnalysisDataset, variant: AmphiboleVariant) -> CalcResult<Fe3Estimate> {
        self.droop(dataset, &variant.config()?)
    }

    /// Papike et al. (1974) clinopyroxene estimate on 6 oxygens
    pub fn papike(&self, dataset: &AnalysisDataset) -> CalcResult<Fe3Estimate> {
        let (constants, iron) = self.prepare(dataset)?;
        let splits = map_rows(dataset.len(), |row| papike_row(&constants, iron, dataset, row));
        apply_split("papike", &self.table, dataset, &splits, no_extra(dataset.len()))
    }

    /// Stormer (1983) spinel estimate on 3 cations
    pub fn stormer(&self, dataset: &AnalysisDataset) -> CalcResult<Fe3Estimate> {
        let (constants, iron) = self.prepare(dataset)?;
        let splits = map_rows(dataset.len(), |row| stormer_row(&constants, iron, dataset, row));
        apply_split("stormer", &self.table, dataset, &splits, no_extra(dataset.len()))
    }
}

fn no_extra(rows: usize) -> (Vec<String>, Vec<Vec<Option<f64>>>) {
    (Vec::new(), vec![Vec::new(); rows])
}
