use super::*;
use crate::error::CalcError;
use std::io::Cursor;

#[test]
fn test_standard_table_contents() {
    let table = OxideReferenceTable::standard();
    assert!(table.len() >= 18);

    let feo = table.get("FeO").unwrap();
    assert_eq!(feo.cation_label, "Fe2");
    assert!((feo.charge() - 2.0).abs() < 1e-12);

    let al = table.get("Al2O3").unwrap();
    assert!((al.charge() - 3.0).abs() < 1e-12);
    assert!((al.oxygens_per_cation() - 1.5).abs() < 1e-12);

    let na = table.get("Na2O").unwrap();
    assert!((na.charge() - 1.0).abs() < 1e-12);
}

#[test]
fn test_resolve_missing_oxide_is_configuration_error() {
    let table = OxideReferenceTable::standard();
    let err = table.resolve("UO2").unwrap_err();
    assert!(matches!(err, CalcError::Configuration(_)));
}

#[test]
fn test_parse_csv_table() {
    let csv = "oxide,molar_mass,cation_count,oxygen_count,cation_label,cation_charge\n\
               SiO2,60.0843,1,2,Si,\n\
               FeO,71.8444,1,1,Fe2,2\n";

    let table = OxideReferenceTable::from_csv_reader(Cursor::new(csv)).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("SiO2").unwrap().cation_charge, None);
    assert!((table.get("SiO2").unwrap().charge() - 4.0).abs() < 1e-12);
    assert_eq!(table.get("FeO").unwrap().cation_charge, Some(2.0));
}

#[test]
fn test_parse_csv_without_charge_column() {
    let csv = "oxide,molar_mass,cation_count,oxygen_count,cation_label\n\
               MgO,40.3044,1,1,Mg\n";

    let table = OxideReferenceTable::from_csv_reader(Cursor::new(csv)).unwrap();
    assert!((table.get("MgO").unwrap().charge() - 2.0).abs() < 1e-12);
}

#[test]
fn test_reject_duplicate_symbol() {
    let result = OxideReferenceTable::from_constants(vec![
        OxideConstants::new("MgO", 40.3044, 1.0, 1.0, "Mg"),
        OxideConstants::new("MgO", 40.3, 1.0, 1.0, "Mg"),
    ]);
    assert!(matches!(result, Err(ReferenceError::Duplicate(s)) if s == "MgO"));
}

#[test]
fn test_reject_non_physical_entry() {
    let result = OxideReferenceTable::from_constants(vec![OxideConstants::new(
        "MgO", 0.0, 1.0, 1.0, "Mg",
    )]);
    assert!(matches!(result, Err(ReferenceError::InvalidEntry { .. })));

    let result = OxideReferenceTable::from_constants(vec![OxideConstants::new(
        "MgO", 40.3, 1.0, -1.0, "Mg",
    )]);
    assert!(matches!(result, Err(ReferenceError::InvalidEntry { .. })));
}

#[test]
fn test_clone_shares_entries() {
    let table = OxideReferenceTable::standard();
    let clone = table.clone();
    assert_eq!(table, clone);
    assert_eq!(
        clone.oxide_for_cation("Fe3").map(|c| c.symbol.as_str()),
        Some("Fe2O3")
    );
}
