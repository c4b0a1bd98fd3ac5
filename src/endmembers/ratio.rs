use super::table::EndmemberTable;
use crate::stoich::CationFormula;
use crate::table::{map_rows, ResultTable};

/// A closed-sum endmember set: `100 * cation / Σ cations` over `(name, cation)`
#[derive(Debug, Clone, Copy)]
pub(crate) struct RatioEndmembers {
    pub method: &'static str,
    pub members: &'static [(&'static str, &'static str)],
}

/// Forsterite, fayalite, tephroite, monticellite
pub(crate) const OLIVINE: RatioEndmembers = RatioEndmembers {
    method: "olivine",
    members: &[("Fo", "Mg"), ("Fay", "Fe2"), ("Teph", "Mn"), ("Mont", "Ca")],
};

/// Anorthite, albite, orthoclase
pub(crate) const FELDSPAR: RatioEndmembers = RatioEndmembers {
    method: "feldspar",
    members: &[("An", "Ca"), ("Ab", "Na"), ("Or", "K")],
};

/// Ferrosilite, enstatite, wollastonite
pub(crate) const CPX_QUAD: RatioEndmembers = RatioEndmembers {
    method: "cpx-quad",
    members: &[("Fs", "Fe2"), ("En", "Mg"), ("Wo", "Ca")],
};

impl RatioEndmembers {
    /// Missing cations count as zero; a zero denominator gives a missing row
    pub fn calculate(&self, formula: &CationFormula) -> EndmemberTable {
        let rows = map_rows(formula.len(), |row| {
            let values: Vec<f64> = self
                .members
                .iter()
                .map(|(_, cation)| formula.get_or_zero(row, cation))
                .collect();
            let total: f64 = values.iter().sum();
            values
                .iter()
                .map(|v| (total > 0.0).then(|| 100.0 * v / total))
                .collect()
        });

        let names = self.members.iter().map(|(name, _)| name.to_string()).collect();
        let table = ResultTable::from_parts(formula.table().shared_ids(), names, rows);
        EndmemberTable::new(self.method, Some(100.0), table)
    }
}
