use std::sync::Arc;

use super::allocator::{RowAllocation, SiteAllocator, SiteFill};
use crate::table::{ColumnData, OutputColumn, ResultTable, TabularOutput};

/// Site allocation of every analysis in a cation formula.
///
/// Output columns per site are `<species>_<site>` (assigned),
/// `<species>_<site>_rem` (left in the pool afterwards) and `<site>_vacancy`,
/// followed by `<species>_unassigned` for every species.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAssignment {
    allocator: SiteAllocator,
    ids: Arc<[String]>,
    rows: Vec<RowAllocation>,
}

impl SiteAssignment {
    pub(crate) fn new(allocator: SiteAllocator, ids: Arc<[String]>, rows: Vec<RowAllocation>) -> Self {
        Self {
            allocator,
            ids,
            rows,
        }
    }

    /// Number of analyses
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no analyses
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Analysis identifiers
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The site layout used
    pub fn allocator(&self) -> &SiteAllocator {
        &self.allocator
    }

    /// Full allocation of one analysis
    pub fn row(&self, row: usize) -> &RowAllocation {
        &self.rows[row]
    }

    fn fill(&self, row: usize, site: &str) -> Option<&SiteFill> {
        self.rows[row].sites.iter().find(|f| f.site == site)
    }

    /// Amount of `species` assigned to `site`; zero if the site does not take it
    pub fn assigned(&self, row: usize, site: &str, species: &str) -> f64 {
        self.fill(row, site).map_or(0.0, |f| f.assigned(species))
    }

    /// Pool of `species` left after `site`, `None` if the site does not take it
    pub fn remainder(&self, row: usize, site: &str, species: &str) -> Option<f64> {
        self.fill(row, site)?
            .species
            .iter()
            .find(|(s, _, _)| s == species)
            .map(|(_, _, rem)| *rem)
    }

    /// Unfilled capacity of `site`
    pub fn vacancy(&self, row: usize, site: &str) -> Option<f64> {
        self.fill(row, site).map(|f| f.vacancy)
    }

    /// Total assigned to `site`
    pub fn site_total(&self, row: usize, site: &str) -> Option<f64> {
        self.fill(row, site)
            .map(|f| f.species.iter().map(|(_, a, _)| a).sum())
    }

    /// Amount of `species` no site took
    pub fn unassigned(&self, row: usize, species: &str) -> f64 {
        self.rows[row].unassigned.get(species).copied().unwrap_or(0.0)
    }

    /// Amount of `species` available before allocation
    pub fn available(&self, row: usize, species: &str) -> f64 {
        self.rows[row].available.get(species).copied().unwrap_or(0.0)
    }

    /// Flatten into a numeric table
    pub fn to_table(&self) -> ResultTable {
        let columns = self.output_columns();
        let names = columns.iter().map(|c| c.name.clone()).collect();
        let rows = (0..self.len())
            .map(|row| {
                columns
                    .iter()
                    .map(|c| match &c.data {
                        ColumnData::Float(values) => values[row],
                        ColumnData::Flag(values) => Some(f64::from(u8::from(values[row]))),
                    })
                    .collect()
            })
            .collect();
        ResultTable::from_parts(Arc::clone(&self.ids), names, rows)
    }
}

impl TabularOutput for SiteAssignment {
    fn row_ids(&self) -> &[String] {
        &self.ids
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        let mut columns = Vec::new();
        for (i, site) in self.allocator.sites().iter().enumerate() {
            for (j, species) in site.priority.iter().enumerate() {
                let assigned = self.rows.iter().map(|r| Some(r.sites[i].species[j].1)).collect();
                let remainder = self.rows.iter().map(|r| Some(r.sites[i].species[j].2)).collect();
                columns.push(OutputColumn::float(format!("{species}_{}", site.name), assigned));
                columns.push(OutputColumn::float(format!("{species}_{}_rem", site.name), remainder));
            }
            let vacancy = self.rows.iter().map(|r| Some(r.sites[i].vacancy)).collect();
            columns.push(OutputColumn::float(format!("{}_vacancy", site.name), vacancy));
        }
        for species in self.allocator.species() {
            let left = self
                .rows
                .iter()
                .map(|r| Some(r.unassigned.get(species).copied().unwrap_or(0.0)))
                .collect();
            columns.push(OutputColumn::float(format!("{species}_unassigned"), left));
        }
        columns
    }
}
