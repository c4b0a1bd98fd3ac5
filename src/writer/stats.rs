use std::fmt;

/// Statistics from a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of analyses written
    pub rows_written: usize,
    /// Number of columns written, including the id column
    pub columns_written: usize,
    /// Number of Parquet row groups (zero for CSV)
    pub row_groups_written: usize,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} analyses x {} columns",
            self.rows_written, self.columns_written
        )?;
        if self.row_groups_written > 0 {
            write!(f, " in {} row groups", self.row_groups_written)?;
        }
        Ok(())
    }
}
