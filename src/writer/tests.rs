use std::fs::File;

use arrow::array::{Array, BooleanArray, Float64Array, StringArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::*;
use crate::table::{OutputColumn, ResultTable, TabularOutput};

struct Flagged {
    ids: Vec<String>,
}

impl TabularOutput for Flagged {
    fn row_ids(&self) -> &[String] {
        &self.ids
    }

    fn output_columns(&self) -> Vec<OutputColumn> {
        vec![
            OutputColumn::float("Si", vec![Some(1.0), None]),
            OutputColumn::flag("cat_good", vec![true, false]),
        ]
    }
}

fn flagged() -> Flagged {
    Flagged {
        ids: vec!["ol-1".to_string(), "ol-2".to_string()],
    }
}

#[test]
fn test_csv_missing_values_are_empty() -> Result<(), WriterError> {
    let mut buffer = Vec::new();
    let stats = write_csv(&mut buffer, &flagged(), &WriterConfig::default())?;

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text, "id,Si,cat_good\nol-1,1,true\nol-2,,false\n");
    assert_eq!(stats.rows_written, 2);
    assert_eq!(stats.columns_written, 3);
    Ok(())
}

#[test]
fn test_id_column_collision_rejected() {
    let config = WriterConfig::default().with_id_column("Si");
    let err = write_csv(Vec::new(), &flagged(), &config).unwrap_err();
    assert!(matches!(err, WriterError::InvalidData(_)));
}

#[test]
fn test_record_batch_types() -> Result<(), WriterError> {
    let batch = to_record_batch(&flagged(), &WriterConfig::default())?;
    assert_eq!(batch.num_rows(), 2);

    let si = batch
        .column(1)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(si.value(0), 1.0);
    assert!(si.is_null(1));

    let good = batch
        .column(2)
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert!(good.value(0));
    assert!(!good.value(1));
    Ok(())
}

#[test]
fn test_parquet_roundtrip_with_footer() -> Result<(), WriterError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cations.parquet");

    let table = ResultTable::new(
        vec!["a".to_string(), "b".to_string(), "c".to_string()].into(),
        vec!["Mg".to_string()],
        vec![vec![Some(1.8)], vec![None], vec![Some(f64::NAN)]],
    )
    .unwrap();
    let parameters = serde_json::json!({ "afu": 4.0, "mineral": "olivine" });
    let config = WriterConfig::default().with_compression(CompressionType::Snappy);
    let stats = write_path(&path, &table, &config, &parameters)?;
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.row_groups_written, 1);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?;
    let footer: Vec<(String, Option<String>)> = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .map(|kv| kv.iter().map(|e| (e.key.clone(), e.value.clone())).collect())
        .unwrap_or_default();
    let stored = footer
        .iter()
        .find(|(k, _)| k == PARAMETERS_KEY)
        .and_then(|(_, v)| v.clone())
        .unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored)?;
    assert_eq!(stored, parameters);
    assert!(footer.iter().any(|(k, _)| k == CREATED_KEY));

    let mut reader = builder.build()?;
    let batch = reader.next().unwrap()?;
    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(ids.value(2), "c");
    let mg = batch
        .column(1)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(mg.value(0), 1.8);
    assert!(mg.is_null(1));
    assert!(mg.is_null(2));
    Ok(())
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_path(
        dir.path().join("out.xlsx"),
        &flagged(),
        &WriterConfig::default(),
        &(),
    )
    .unwrap_err();
    assert!(matches!(err, WriterError::InvalidData(_)));
    assert_eq!(OutputFormat::from_path("x.PARQUET"), Some(OutputFormat::Parquet));
}

#[test]
fn test_stats_display() {
    let stats = WriterStats {
        rows_written: 4,
        columns_written: 6,
        row_groups_written: 1,
    };
    assert_eq!(stats.to_string(), "Wrote 4 analyses x 6 columns in 1 row groups");
}
