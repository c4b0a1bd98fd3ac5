use std::io::Write;

use super::*;
use crate::reference::OxideReferenceTable;

const SCOPE: [&str; 4] = ["SiO2", "FeO", "MgO", "CaO"];

const OLIVINE_CSV: &str = "\
Sample,SiO2,FeO,MgO,Total
ol-1,40.8,9.1,49.6,99.5
ol-2, 39.9 ,bdl,45.0,84.9
ol-3,41.2,<,,41.2
";

#[test]
fn test_reads_ids_and_missing_markers() {
    let table = OxideReferenceTable::standard();
    let options = IngestOptions::default().with_id_column("Sample");
    let dataset = read_analyses(OLIVINE_CSV.as_bytes(), &table, &SCOPE, &options).unwrap();

    assert_eq!(dataset.ids(), ["ol-1", "ol-2", "ol-3"]);
    assert_eq!(dataset.value(1, "SiO2"), Some(39.9));
    assert_eq!(dataset.value(1, "FeO"), None);
    assert_eq!(dataset.value(2, "FeO"), None);
    assert_eq!(dataset.value(2, "MgO"), None);
    // CaO is not in the header
    assert_eq!(dataset.column("CaO"), Some(&[None, None, None][..]));
    // Total is outside the scope
    assert!(dataset.column("Total").is_none());
}

#[test]
fn test_row_numbers_without_id_column() {
    let table = OxideReferenceTable::standard();
    let dataset =
        read_analyses(OLIVINE_CSV.as_bytes(), &table, &SCOPE, &IngestOptions::default()).unwrap();
    assert_eq!(dataset.id(0), "1");
    assert_eq!(dataset.id(2), "3");
}

#[test]
fn test_invalid_cell_reports_location() {
    let table = OxideReferenceTable::standard();
    let csv = "SiO2,MgO\n40.1,49.0\n41.0,lots\n";
    let err = read_analyses(csv.as_bytes(), &table, &SCOPE, &IngestOptions::default()).unwrap_err();
    match err {
        IngestError::InvalidValue { row, column, value } => {
            assert_eq!(row, 2);
            assert_eq!(column, "MgO");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_custom_markers() {
    let table = OxideReferenceTable::standard();
    let csv = "SiO2,MgO\n40.1,--\n41.0,<0.01\n";
    let options = IngestOptions::default().with_missing_markers(&["--", "<0.01"]);
    let dataset = read_analyses(csv.as_bytes(), &table, &SCOPE, &options).unwrap();
    assert_eq!(dataset.value(0, "MgO"), None);
    assert_eq!(dataset.value(1, "MgO"), None);

    let strict = IngestOptions::default().with_missing_markers::<&str>(&[]);
    assert!(read_analyses("SiO2,MgO\n40,\n".as_bytes(), &table, &SCOPE, &strict).is_err());
}

#[test]
fn test_missing_id_column_and_unknown_scope() {
    let table = OxideReferenceTable::standard();
    let options = IngestOptions::default().with_id_column("Label");
    assert!(matches!(
        read_analyses(OLIVINE_CSV.as_bytes(), &table, &SCOPE, &options),
        Err(IngestError::MissingColumn(_))
    ));

    let err = read_analyses(
        OLIVINE_CSV.as_bytes(),
        &table,
        &["SiO2", "UO2"],
        &IngestOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Dataset(_)));
}

#[test]
fn test_reads_tab_separated_file() {
    let table = OxideReferenceTable::standard();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "id\tSiO2\tMgO").unwrap();
    writeln!(file, "fo\t42.71\t57.29").unwrap();

    let options = IngestOptions::default().tab_separated().with_id_column("id");
    let dataset = read_analyses_path(file.path(), &table, &SCOPE, &options).unwrap();
    assert_eq!(dataset.ids(), ["fo"]);
    assert_eq!(dataset.value(0, "MgO"), Some(57.29));
}
