use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use log::debug;

use super::Analysis;
use crate::error::{CalcError, CalcResult};
use crate::reference::OxideReferenceTable;

/// One oxide column: weight percent per analysis, `None` where missing
pub type OxideColumn = Arc<[Option<f64>]>;

/// In-memory table of analyses paired with the oxides in scope for a mineral.
///
/// Columns are stored behind `Arc`s. Deriving a new dataset (for example after
/// Fe3+ estimation) replaces or appends individual columns and shares every
/// other column with the original, which is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDataset {
    ids: Arc<[String]>,
    columns: BTreeMap<String, OxideColumn>,
    scope: Arc<[String]>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn validate_scope<S: AsRef<str>>(
    table: &OxideReferenceTable,
    scope: &[S],
) -> CalcResult<Arc<[String]>> {
    if scope.is_empty() {
        return Err(CalcError::configuration("oxide scope is empty"));
    }

    let mut seen = BTreeSet::new();
    for oxide in scope {
        let oxide = oxide.as_ref();
        table.resolve(oxide)?;
        if !seen.insert(oxide) {
            return Err(CalcError::configuration(format!(
                "oxide '{oxide}' appears twice in the scope"
            )));
        }
    }

    Ok(scope.iter().map(|s| s.as_ref().to_string()).collect())
}

impl AnalysisDataset {
    /// Build a dataset from analyses.
    ///
    /// Fails with a configuration error if any in-scope oxide, or any oxide
    /// present in an analysis, is absent from `table`. In-scope oxides that an
    /// analysis does not report are stored as missing.
    pub fn new<S: AsRef<str>>(
        table: &OxideReferenceTable,
        scope: &[S],
        analyses: impl IntoIterator<Item = Analysis>,
    ) -> CalcResult<Self> {
        let scope = validate_scope(table, scope)?;
        let analyses: Vec<Analysis> = analyses.into_iter().collect();

        let mut names: BTreeSet<&str> = scope.iter().map(String::as_str).collect();
        for analysis in &analyses {
            for oxide in analysis.oxides.keys() {
                table.resolve(oxide)?;
                names.insert(oxide.as_str());
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let values: OxideColumn = analyses.iter().map(|a| a.get(name)).collect();
                (name.to_string(), values)
            })
            .collect();

        let ids: Arc<[String]> = analyses.into_iter().map(|a| a.id).collect();
        debug!(
            "Built dataset with {} analyses and {} oxides in scope",
            ids.len(),
            scope.len()
        );

        Ok(Self {
            ids,
            columns,
            scope,
        })
    }

    /// Build a dataset from pre-assembled columns.
    ///
    /// Every column must have one value per id. In-scope oxides without a
    /// column are treated as not analysed.
    pub fn from_columns<S: AsRef<str>>(
        table: &OxideReferenceTable,
        scope: &[S],
        ids: Vec<String>,
        columns: impl IntoIterator<Item = (String, Vec<Option<f64>>)>,
    ) -> CalcResult<Self> {
        let scope = validate_scope(table, scope)?;
        let n = ids.len();

        let mut stored = BTreeMap::new();
        for (name, values) in columns {
            table.resolve(&name)?;
            if values.len() != n {
                return Err(CalcError::input(format!(
                    "column '{name}' has {} values, expected {n}",
                    values.len()
                )));
            }
            let values: OxideColumn = values.into_iter().map(finite).collect();
            if stored.insert(name.clone(), values).is_some() {
                return Err(CalcError::input(format!("column '{name}' given twice")));
            }
        }

        for oxide in scope.iter() {
            stored
                .entry(oxide.clone())
                .or_insert_with(|| vec![None; n].into());
        }

        Ok(Self {
            ids: ids.into(),
            columns: stored,
            scope,
        })
    }

    /// Number of analyses
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the dataset has no analyses
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Analysis identifiers in row order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub(crate) fn shared_ids(&self) -> Arc<[String]> {
        Arc::clone(&self.ids)
    }

    /// Identifier of one analysis
    pub fn id(&self, row: usize) -> &str {
        &self.ids[row]
    }

    /// Oxides in scope for the current mineral, in order
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Whether an oxide is in scope
    pub fn in_scope(&self, oxide: &str) -> bool {
        self.scope.iter().any(|s| s == oxide)
    }

    /// All stored oxide columns, in or out of scope
    pub fn oxides(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// One oxide column
    pub fn column(&self, oxide: &str) -> Option<&[Option<f64>]> {
        self.columns.get(oxide).map(|c| &c[..])
    }

    /// Weight percent of one oxide in one analysis
    pub fn value(&self, row: usize, oxide: &str) -> Option<f64> {
        self.columns.get(oxide).and_then(|c| c[row])
    }

    /// Weight percents of one analysis, ordered as the scope
    pub fn scoped_row(&self, row: usize) -> Vec<Option<f64>> {
        self.scope.iter().map(|oxide| self.value(row, oxide)).collect()
    }

    /// Reassemble one analysis (all stored oxides)
    pub fn analysis(&self, row: usize) -> Analysis {
        let mut analysis = Analysis::new(self.id(row));
        for (oxide, column) in &self.columns {
            if let Some(value) = column[row] {
                analysis.set(oxide.clone(), value);
            }
        }
        analysis
    }

    /// Derive a dataset with `oxide` replaced (or appended and brought into
    /// scope). All other columns are shared with `self`.
    pub fn with_column(
        &self,
        table: &OxideReferenceTable,
        oxide: &str,
        values: Vec<Option<f64>>,
    ) -> CalcResult<Self> {
        table.resolve(oxide)?;
        if values.len() != self.len() {
            return Err(CalcError::input(format!(
                "column '{oxide}' has {} values, expected {}",
                values.len(),
                self.len()
            )));
        }

        let mut columns = self.columns.clone();
        columns.insert(
            oxide.to_string(),
            values.into_iter().map(finite).collect(),
        );

        let scope = if self.in_scope(oxide) {
            Arc::clone(&self.scope)
        } else {
            self.scope
                .iter()
                .cloned()
                .chain(std::iter::once(oxide.to_string()))
                .collect()
        };

        Ok(Self {
            ids: Arc::clone(&self.ids),
            columns,
            scope,
        })
    }

    /// Derive a dataset with a different oxide scope over the same columns
    pub fn with_scope<S: AsRef<str>>(
        &self,
        table: &OxideReferenceTable,
        scope: &[S],
    ) -> CalcResult<Self> {
        let scope = validate_scope(table, scope)?;
        let mut columns = self.columns.clone();
        for oxide in scope.iter() {
            columns
                .entry(oxide.clone())
                .or_insert_with(|| vec![None; self.len()].into());
        }

        Ok(Self {
            ids: Arc::clone(&self.ids),
            columns,
            scope,
        })
    }

    /// Whether `other` holds the very same storage for `oxide`
    pub fn shares_column(&self, other: &Self, oxide: &str) -> bool {
        match (self.columns.get(oxide), other.columns.get(oxide)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
