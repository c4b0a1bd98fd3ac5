use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;
use crate::table::{ColumnData, OutputColumn, TabularOutput};

/// Footer key holding the JSON-serialized run parameters
pub const PARAMETERS_KEY: &str = "probecalc:parameters";

/// Footer key holding the RFC 3339 creation time
pub const CREATED_KEY: &str = "probecalc:created";

/// Footer key holding the crate version
pub const VERSION_KEY: &str = "probecalc:version";

/// On-disk table format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated text
    Csv,
    /// Apache Parquet
    Parquet,
}

impl OutputFormat {
    /// Format implied by a file extension (`.csv`, `.parquet`/`.pq`)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

fn checked_columns<T: TabularOutput + ?Sized>(
    table: &T,
    config: &WriterConfig,
) -> Result<Vec<OutputColumn>, WriterError> {
    let rows = table.row_ids().len();
    let columns = table.output_columns();
    for column in &columns {
        if column.name == config.id_column {
            return Err(WriterError::InvalidData(format!(
                "column '{}' collides with the id column",
                column.name
            )));
        }
        if column.data.len() != rows {
            return Err(WriterError::InvalidData(format!(
                "column '{}' has {} values, expected {rows}",
                column.name,
                column.data.len()
            )));
        }
    }
    Ok(columns)
}

fn format_cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Float(values) => values[row]
            .filter(|v| v.is_finite())
            .map(|v| v.to_string())
            .unwrap_or_default(),
        ColumnData::Flag(values) => values[row].to_string(),
    }
}

/// Write a table as CSV; missing values become empty cells
pub fn write_csv<W, T>(writer: W, table: &T, config: &WriterConfig) -> Result<WriterStats, WriterError>
where
    W: Write,
    T: TabularOutput + ?Sized,
{
    let columns = checked_columns(table, config)?;
    let ids = table.row_ids();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header = std::iter::once(config.id_column.as_str())
        .chain(columns.iter().map(|c| c.name.as_str()));
    csv_writer.write_record(header)?;

    for (row, id) in ids.iter().enumerate() {
        let record = std::iter::once(id.clone())
            .chain(columns.iter().map(|c| format_cell(&c.data, row)));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;

    Ok(WriterStats {
        rows_written: ids.len(),
        columns_written: columns.len() + 1,
        row_groups_written: 0,
    })
}

fn build_array(data: &ColumnData) -> ArrayRef {
    match data {
        ColumnData::Float(values) => {
            let mut builder = Float64Builder::with_capacity(values.len());
            for value in values {
                builder.append_option(value.filter(|v| v.is_finite()));
            }
            Arc::new(builder.finish())
        }
        ColumnData::Flag(values) => {
            let mut builder = BooleanBuilder::with_capacity(values.len());
            builder.append_slice(values);
            Arc::new(builder.finish())
        }
    }
}

/// Arrow record batch of a table: a Utf8 id column, nullable Float64 value
/// columns and non-null Boolean flag columns
pub fn to_record_batch<T: TabularOutput + ?Sized>(
    table: &T,
    config: &WriterConfig,
) -> Result<RecordBatch, WriterError> {
    let columns = checked_columns(table, config)?;
    let ids = table.row_ids();

    let mut fields = vec![Field::new(&config.id_column, DataType::Utf8, false)];
    let mut id_builder = StringBuilder::with_capacity(ids.len(), ids.iter().map(String::len).sum());
    for id in ids {
        id_builder.append_value(id);
    }
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(id_builder.finish())];

    for column in &columns {
        let field = match column.data {
            ColumnData::Float(_) => Field::new(&column.name, DataType::Float64, true),
            ColumnData::Flag(_) => Field::new(&column.name, DataType::Boolean, false),
        };
        fields.push(field);
        arrays.push(build_array(&column.data));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Footer metadata for a run
pub fn footer_metadata<P: Serialize + ?Sized>(
    parameters: &P,
) -> Result<HashMap<String, String>, WriterError> {
    let mut metadata = HashMap::new();
    metadata.insert(PARAMETERS_KEY.to_string(), serde_json::to_string(parameters)?);
    metadata.insert(CREATED_KEY.to_string(), chrono::Utc::now().to_rfc3339());
    metadata.insert(VERSION_KEY.to_string(), env!("CARGO_PKG_VERSION").to_string());
    Ok(metadata)
}

/// Write a table as Parquet with the run parameters in the footer
pub fn write_parquet<W, T, P>(
    writer: W,
    table: &T,
    config: &WriterConfig,
    parameters: &P,
) -> Result<WriterStats, WriterError>
where
    W: Write + Send,
    T: TabularOutput + ?Sized,
    P: Serialize + ?Sized,
{
    let batch = to_record_batch(table, config)?;
    let props = config.to_writer_properties(&footer_metadata(parameters)?);

    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    arrow_writer.write(&batch)?;
    let file_metadata = arrow_writer.close()?;

    debug!(
        "Wrote {} rows in {} row groups ({})",
        file_metadata.num_rows,
        file_metadata.row_groups.len(),
        config.compression
    );

    Ok(WriterStats {
        rows_written: batch.num_rows(),
        columns_written: batch.num_columns(),
        row_groups_written: file_metadata.row_groups.len(),
    })
}

/// Write a table to a file, choosing the format from its extension
pub fn write_path<Q, T, P>(
    path: Q,
    table: &T,
    config: &WriterConfig,
    parameters: &P,
) -> Result<WriterStats, WriterError>
where
    Q: AsRef<Path>,
    T: TabularOutput + ?Sized,
    P: Serialize + ?Sized,
{
    let path = path.as_ref();
    let format = OutputFormat::from_path(path).ok_or_else(|| {
        WriterError::InvalidData(format!(
            "cannot infer output format from '{}' (expected .csv or .parquet)",
            path.display()
        ))
    })?;

    let file = File::create(path)?;
    match format {
        OutputFormat::Csv => write_csv(file, table, config),
        OutputFormat::Parquet => write_parquet(file, table, config, parameters),
    }
}
