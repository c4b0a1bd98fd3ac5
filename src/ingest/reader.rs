use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::IngestError;
use crate::dataset::AnalysisDataset;
use crate::reference::OxideReferenceTable;

/// Cell texts read as "not analyzed / below detection"
pub const DEFAULT_MISSING_MARKERS: [&str; 6] = ["", "<", "-", "n.d.", "bdl", "NaN"];

/// How to read an analysis CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Column holding analysis identifiers; row numbers are used when `None`
    pub id_column: Option<String>,
    /// Cell texts treated as missing (compared case-insensitively after trimming)
    pub missing_markers: Vec<String>,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            id_column: None,
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
            delimiter: b',',
        }
    }
}

impl IngestOptions {
    /// Use `column` for analysis identifiers
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Replace the missing markers
    pub fn with_missing_markers<S: AsRef<str>>(mut self, markers: &[S]) -> Self {
        self.missing_markers = markers.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Use tab-separated input
    pub fn tab_separated(mut self) -> Self {
        self.delimiter = b'\t';
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.missing_markers
            .iter()
            .any(|m| m.trim().eq_ignore_ascii_case(cell))
    }

    fn parse_cell(&self, cell: &str, row: usize, column: &str) -> Result<Option<f64>, IngestError> {
        let cell = cell.trim();
        if self.is_missing(cell) {
            return Ok(None);
        }
        let value: f64 = cell.parse().map_err(|_| IngestError::InvalidValue {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        })?;
        Ok(Some(value).filter(|v| v.is_finite()))
    }
}

/// Read analyses from a CSV file
pub fn read_analyses_path<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    table: &OxideReferenceTable,
    scope: &[S],
    options: &IngestOptions,
) -> Result<AnalysisDataset, IngestError> {
    let file = File::open(path)?;
    read_analyses(BufReader::new(file), table, scope, options)
}

/// Read analyses from CSV text.
///
/// Oxide columns are matched to `scope` by header. Columns outside the scope
/// are ignored; scope oxides the header does not name are missing in every
/// analysis.
pub fn read_analyses<R: Read, S: AsRef<str>>(
    reader: R,
    table: &OxideReferenceTable,
    scope: &[S],
    options: &IngestOptions,
) -> Result<AnalysisDataset, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let id_index = match &options.id_column {
        Some(name) => Some(
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IngestError::MissingColumn(name.clone()))?,
        ),
        None => None,
    };

    let oxide_indices: Vec<(String, Option<usize>)> = scope
        .iter()
        .map(|oxide| {
            let oxide = oxide.as_ref();
            (oxide.to_string(), headers.iter().position(|h| h == oxide))
        })
        .collect();
    let absent: Vec<&str> = oxide_indices
        .iter()
        .filter(|(_, i)| i.is_none())
        .map(|(o, _)| o.as_str())
        .collect();
    if !absent.is_empty() {
        warn!("Oxides not in the input header, treated as not analyzed: {absent:?}");
    }

    let mut ids = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); oxide_indices.len()];

    for (n, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = n + 1;

        let id = id_index
            .and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| row.to_string());
        ids.push(id);

        for ((oxide, index), column) in oxide_indices.iter().zip(columns.iter_mut()) {
            let value = match index.and_then(|i| record.get(i)) {
                Some(cell) => options.parse_cell(cell, row, oxide)?,
                None => None,
            };
            column.push(value);
        }
    }

    info!("Read {} analyses with {} oxides in scope", ids.len(), scope.len());

    let columns: Vec<(String, Vec<Option<f64>>)> = oxide_indices
        .into_iter()
        .map(|(oxide, _)| oxide)
        .zip(columns)
        .collect();
    Ok(AnalysisDataset::from_columns(table, scope, ids, columns)?)
}
