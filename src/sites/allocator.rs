use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::assignment::SiteAssignment;
use crate::error::{CalcError, CalcResult};
use crate::stoich::{CationFormula, HeaderStyle};
use crate::table::map_rows;

/// One crystallographic site: a fixed capacity filled in priority order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site name (`T`, `M1`, `A`, ...)
    pub name: String,
    /// Cations per formula unit the site holds
    pub capacity: f64,
    /// Cation labels in filling order
    pub priority: Vec<String>,
}

impl Site {
    /// Create a site
    pub fn new(name: impl Into<String>, capacity: f64, priority: &[&str]) -> Self {
        Self {
            name: name.into(),
            capacity,
            priority: priority.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Cations still available to later sites, by label
pub type Pools = BTreeMap<String, f64>;

/// What one site took from the pools
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFill {
    /// Site name
    pub site: String,
    /// `(species, assigned, remainder)` in priority order
    pub species: Vec<(String, f64, f64)>,
    /// Capacity left unfilled
    pub vacancy: f64,
}

impl SiteFill {
    /// Amount of `species` assigned to this site
    pub fn assigned(&self, species: &str) -> f64 {
        self.species
            .iter()
            .find(|(s, _, _)| s == species)
            .map_or(0.0, |(_, a, _)| *a)
    }
}

/// Allocation of one analysis across every site
#[derive(Debug, Clone, PartialEq)]
pub struct RowAllocation {
    /// Pools before the first site
    pub available: Pools,
    /// One entry per site, in site order
    pub sites: Vec<SiteFill>,
    /// Pools after the last site
    pub unassigned: Pools,
}

/// Greedy, priority-ordered distribution of cations over a sequence of sites.
///
/// Each site takes `min(pool, remaining capacity)` of each species in its
/// priority order and stops once full. Whatever a site does not take stays in
/// the pool for later sites. Nothing is created or lost:
/// `Σ assigned + unassigned == available` for every species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAllocator {
    sites: Vec<Site>,
}

/// Fill one site from `pools`, returning the depleted pools
pub fn fill_site(mut pools: Pools, site: &Site) -> (Pools, SiteFill) {
    let mut remaining = site.capacity;
    let mut species = Vec::with_capacity(site.priority.len());

    for label in &site.priority {
        let pool = pools.entry(label.clone()).or_insert(0.0);
        let assigned = pool.max(0.0).min(remaining.max(0.0));
        *pool -= assigned;
        remaining -= assigned;
        species.push((label.clone(), assigned, *pool));
    }

    let fill = SiteFill {
        site: site.name.clone(),
        species,
        vacancy: remaining.max(0.0),
    };
    (pools, fill)
}

impl SiteAllocator {
    /// Build an allocator over an ordered list of sites.
    ///
    /// Site names must be unique and capacities non-negative.
    pub fn new(sites: Vec<Site>) -> CalcResult<Self> {
        if sites.is_empty() {
            return Err(CalcError::configuration("site allocator needs at least one site"));
        }
        for (i, site) in sites.iter().enumerate() {
            if !(site.capacity.is_finite() && site.capacity >= 0.0) {
                return Err(CalcError::configuration(format!(
                    "site '{}' has invalid capacity {}",
                    site.name, site.capacity
                )));
            }
            if sites[..i].iter().any(|s| s.name == site.name) {
                return Err(CalcError::configuration(format!(
                    "site '{}' is defined twice",
                    site.name
                )));
            }
            for (j, label) in site.priority.iter().enumerate() {
                if site.priority[..j].contains(label) {
                    return Err(CalcError::configuration(format!(
                        "site '{}' lists '{label}' twice",
                        site.name
                    )));
                }
            }
        }
        Ok(Self { sites })
    }

    /// Sites in filling order
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Every species named by any site, in first-appearance order
    pub fn species(&self) -> Vec<&str> {
        let mut species: Vec<&str> = Vec::new();
        for label in self.sites.iter().flat_map(|s| &s.priority) {
            if !species.contains(&label.as_str()) {
                species.push(label);
            }
        }
        species
    }

    /// Allocate one analysis
    pub fn allocate_row(&self, available: &Pools) -> RowAllocation {
        let (unassigned, sites) = self.sites.iter().fold(
            (available.clone(), Vec::with_capacity(self.sites.len())),
            |(pools, mut fills), site| {
                let (pools, fill) = fill_site(pools, site);
                fills.push(fill);
                (pools, fills)
            },
        );

        RowAllocation {
            available: available.clone(),
            sites,
            unassigned,
        }
    }

    /// Allocate every analysis of a cation formula.
    ///
    /// The formula must carry cation-label headers. Missing cations count as
    /// zero.
    pub fn allocate(&self, formula: &CationFormula) -> CalcResult<SiteAssignment> {
        if formula.headers() != HeaderStyle::Cation {
            return Err(CalcError::input(
                "site allocation needs a cation formula with cation-label headers",
            ));
        }
        debug!(
            "Allocating {} analyses over sites {:?}",
            formula.len(),
            self.sites.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
        );

        let species = self.species();
        let rows = map_rows(formula.len(), |row| {
            let available: Pools = species
                .iter()
                .map(|s| (s.to_string(), formula.get_or_zero(row, s)))
                .collect();
            self.allocate_row(&available)
        });

        Ok(SiteAssignment::new(
            self.clone(),
            formula.table().shared_ids(),
            rows,
        ))
    }
}
