use crate::table::{OutputColumn, ResultTable, TabularOutput};

/// Endmember proportions, one row per analysis
#[derive(Debug, Clone, PartialEq)]
pub struct EndmemberTable {
    method: String,
    closed_sum: Option<f64>,
    table: ResultTable,
}

impl EndmemberTable {
    pub(crate) fn new(method: &str, closed_sum: Option<f64>, table: ResultTable) -> Self {
        Self {
            method: method.to_string(),
            closed_sum,
            table,
        }
    }

    /// Calculator that produced the table
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Sum every complete row adds up to (100 for percentages), or `None` for
    /// an unconstrained component set
    pub fn closed_sum(&self) -> Option<f64> {
        self.closed_sum
    }

    /// Proportion of one endmember in one analysis
    pub fn get(&self, row: usize, endmember: &str) -> Option<f64> {
        self.table.get(row, endmember)
    }

    /// Endmember names
    pub fn endmembers(&self) -> &[String] {
        self.table.columns()
    }

    /// Number of analyses
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether there are no analyses
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Underlying numeric table
    pub fn table(&self) -> &ResultTable {
        &self.table
    }
}

impl TabularOutput for EndmemberTable {
    fn row_ids(&self) -> &[String] {
        self.table.ids()
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        self.table.output_columns()
    }
}
