//! # Result Tables
//!
//! Every stage produces a table with one row per input analysis. Numeric
//! values are `Option<f64>`: `None` marks an undefined result (a missing
//! measurement or a ratio with a zero denominator), never an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CalcError, CalcResult};

/// Column payload handed to writers
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Nullable floating-point values
    Float(Vec<Option<f64>>),
    /// Boolean flags (never null)
    Flag(Vec<bool>),
}

impl ColumnData {
    /// Number of values in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Flag(values) => values.len(),
        }
    }

    /// Whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named output column
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    /// Column header
    pub name: String,
    /// Column values
    pub data: ColumnData,
}

impl OutputColumn {
    /// Create a nullable float column
    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Float(values),
        }
    }

    /// Create a flag column
    pub fn flag(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Flag(values),
        }
    }
}

/// Anything that can be written as "one row per analysis"
pub trait TabularOutput {
    /// Analysis identifiers in row order
    fn row_ids(&self) -> &[String];

    /// Data columns (the id column is added by the writer)
    fn output_columns(&self) -> Vec<OutputColumn>;
}

/// Numeric table with one row per analysis
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    ids: Arc<[String]>,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl ResultTable {
    /// Create a table, checking that every row matches the header
    pub fn new(
        ids: Arc<[String]>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> CalcResult<Self> {
        if rows.len() != ids.len() {
            return Err(CalcError::input(format!(
                "table has {} rows but {} ids",
                rows.len(),
                ids.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(CalcError::input(format!(
                "row {i} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }

        Ok(Self::from_parts(ids, columns, rows))
    }

    pub(crate) fn from_parts(
        ids: Arc<[String]>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(ids.len(), rows.len());
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { ids, columns, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Analysis identifiers in row order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub(crate) fn shared_ids(&self) -> Arc<[String]> {
        Arc::clone(&self.ids)
    }

    /// Column headers
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value at (`row`, `column`); `None` if missing or the column is absent
    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        self.column_index(column).and_then(|i| self.rows[row][i])
    }

    /// Value at (`row`, `column`) with missing treated as zero
    pub fn get_or_zero(&self, row: usize, column: &str) -> f64 {
        self.get(row, column).unwrap_or(0.0)
    }

    /// One row
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        &self.rows[row]
    }

    /// All rows
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// One column, `None` if absent
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let i = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[i]).collect())
    }

    /// Present values of one row keyed by column
    pub fn row_map(&self, row: usize) -> BTreeMap<&str, f64> {
        self.columns
            .iter()
            .zip(&self.rows[row])
            .filter_map(|(name, value)| value.map(|v| (name.as_str(), v)))
            .collect()
    }

    /// Sum of one row with missing values contributing nothing
    pub fn row_sum(&self, row: usize) -> f64 {
        self.rows[row].iter().flatten().sum()
    }

    /// Append a column, returning the extended table
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> CalcResult<Self> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(CalcError::input(format!(
                "column '{name}' has {} values, expected {}",
                values.len(),
                self.len()
            )));
        }
        if self.has_column(&name) {
            return Err(CalcError::input(format!("column '{name}' already exists")));
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }
}

impl TabularOutput for ResultTable {
    fn row_ids(&self) -> &[String] {
        &self.ids
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                OutputColumn::float(name.clone(), self.rows.iter().map(|r| r[i]).collect())
            })
            .collect()
    }
}

/// Map every row index through `f`, in parallel with the `parallel` feature.
///
/// Rows are independent, so the result is identical either way.
pub(crate) fn map_rows<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..n).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}

/// Fallible [`map_rows`]; the first error (in row order when sequential) wins
pub(crate) fn try_map_rows<T, E, F>(n: usize, f: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(usize) -> Result<T, E> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..n).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}
