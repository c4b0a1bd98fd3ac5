//! Integration tests for probecalc
//!
//! These tests run the recalculation stages end to end through the public API.

use std::fs::{self, File};

use parquet::file::reader::{FileReader, SerializedFileReader};
use probecalc::prelude::*;
use probecalc::endmembers::{dietrich_decomposition, DIETRICH_COMPONENTS, DIETRICH_ENDMEMBERS};
use probecalc::sites::Pools;
use probecalc::writer::{write_path, PARAMETERS_KEY};
use tempfile::tempdir;

const OLIVINE_SCOPE: [&str; 5] = ["SiO2", "FeO", "MgO", "MnO", "CaO"];

/// Pure forsterite on 4 oxygens
#[test]
fn test_forsterite_scenario() {
    let table = OxideReferenceTable::standard();
    let analyses = vec![Analysis::new("fo").with("SiO2", 42.71).with("MgO", 57.29)];
    let dataset = AnalysisDataset::new(&table, &OLIVINE_SCOPE, analyses).unwrap();

    let formula = StoichiometryEngine::new(&table)
        .check_cations(&dataset, 4.0, &CationCheck::new(3.0))
        .unwrap();
    assert!((formula.get(0, "Si").unwrap() - 1.0).abs() < 0.01);
    assert!((formula.get(0, "Mg").unwrap() - 2.0).abs() < 0.01);
    assert_eq!(formula.get(0, "Fe2"), None);
    assert_eq!(formula.get_or_zero(0, "Mn"), 0.0);
    assert!((formula.cat_tot(0) - 3.0).abs() < 0.01);
    assert_eq!(formula.cat_good(0), Some(true));

    let endmembers = EndmemberCalc::Olivine.calculate(&formula).unwrap();
    assert!((endmembers.get(0, "Fo").unwrap() - 100.0).abs() < 1e-9);
    for name in ["Fay", "Teph", "Mont"] {
        assert_eq!(endmembers.get(0, name), Some(0.0));
    }
}

/// A tetrahedral site filled past capacity carries the excess over
#[test]
fn test_site_allocator_carry_over() {
    let allocator = SiteAllocator::new(vec![Site::new("T", 2.0, &["Al", "Fe3", "Cr"])]).unwrap();
    let pools: Pools = [("Al", 1.5), ("Fe3", 1.0), ("Cr", 0.2)]
        .into_iter()
        .map(|(s, v)| (s.to_string(), v))
        .collect();

    let allocation = allocator.allocate_row(&pools);
    let t = &allocation.sites[0];
    assert_eq!(
        t.species,
        vec![
            ("Al".to_string(), 1.5, 0.0),
            ("Fe3".to_string(), 0.5, 0.5),
            ("Cr".to_string(), 0.0, 0.2),
        ]
    );
    assert_eq!(t.vacancy, 0.0);
    assert_eq!(allocation.unassigned["Fe3"], 0.5);
}

/// An analysis already at the ideal cation total keeps all of its iron ferrous
#[test]
fn test_droop_clamp_scenario() {
    let table = OxideReferenceTable::standard();
    let feo = table.get("FeO").unwrap().molar_mass * 2.0;
    let sio2 = table.get("SiO2").unwrap().molar_mass;
    let total = feo + sio2;
    let analyses = vec![Analysis::new("fa")
        .with("SiO2", 100.0 * sio2 / total)
        .with("FeO", 100.0 * feo / total)];
    let dataset = AnalysisDataset::new(&table, &["SiO2", "FeO", "MgO"], analyses).unwrap();

    let estimate = Fe3EstimationEngine::new(&table)
        .droop(&dataset, &DroopConfig::general(4.0, 3.0))
        .unwrap();
    let derived = estimate.dataset();
    assert!(estimate.fe3(0).unwrap() < 1e-9);
    assert!((derived.value(0, "FeO").unwrap() - dataset.value(0, "FeO").unwrap()).abs() < 1e-6);
    assert!(derived.value(0, "Fe2O3").unwrap() < 1e-6);
}

#[test]
fn test_fe3_requires_total_iron_as_feo() {
    let table = OxideReferenceTable::standard();
    let analyses = vec![Analysis::new("x").with("SiO2", 50.0).with("Fe2O3", 5.0)];
    let dataset = AnalysisDataset::new(&table, &["SiO2", "FeO", "Fe2O3"], analyses).unwrap();
    let err = Fe3EstimationEngine::new(&table)
        .estimate(&dataset, &Fe3Method::Papike)
        .unwrap_err();
    assert!(matches!(err, CalcError::Input(_)));
}

#[test]
fn test_not_yet_implemented_methods_fail_loudly() {
    let table = OxideReferenceTable::standard();
    let analyses = vec![Analysis::new("sp").with("Al2O3", 60.0).with("MgO", 28.0)];
    let preset = MineralPreset::builtin("spinel").unwrap();
    let dataset = preset.dataset(&table, analyses).unwrap();
    let formula = StoichiometryEngine::new(&table)
        .cations(&dataset, preset.afu, HeaderStyle::Cation)
        .unwrap();

    assert!(matches!(
        EndmemberCalc::Spinel.calculate(&formula),
        Err(CalcError::NotYetImplemented(_))
    ));
    assert!(matches!(
        SiteScheme::AmphLeake1997Fe3.assign(&formula),
        Err(CalcError::NotYetImplemented(_))
    ));
}

/// CSV in, Droop, Morimoto sites and Dietrich endmembers, Parquet out
#[test]
fn test_clinopyroxene_csv_to_parquet() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cpx.csv");
    fs::write(
        &input,
        "Sample,SiO2,TiO2,Al2O3,Cr2O3,FeO,MgO,MnO,CaO,Na2O,Total\n\
         aug-1,51.5,0.6,3.2,0.3,7.8,15.4,0.2,20.3,0.5,99.8\n\
         aug-2,50.9,0.8,4.1,bdl,8.6,14.7,0.2,20.1,0.6,100.0\n\
         blank,,,,,,,,,,\n",
    )
    .unwrap();

    let table = OxideReferenceTable::standard();
    let preset = MineralPreset::builtin("cpx").unwrap();
    let options = IngestOptions::default().with_id_column("Sample");
    let dataset = read_analyses_path(&input, &table, &preset.oxides, &options).unwrap();
    assert_eq!(dataset.ids(), ["aug-1", "aug-2", "blank"]);

    let estimate = Fe3EstimationEngine::new(&table)
        .droop(&dataset, &DroopConfig::general(preset.afu, preset.cfu))
        .unwrap();
    assert_eq!(estimate.fe3(2), None);

    let formula = StoichiometryEngine::new(&table)
        .check_cations(estimate.dataset(), preset.afu, &preset.check(0.01))
        .unwrap();
    // Droop brings the cation total to the ideal for every measured analysis
    for row in 0..2 {
        assert!((formula.cat_tot(row) - 4.0).abs() < 1e-3);
        assert_eq!(formula.cat_good(row), Some(true));
    }
    assert_eq!(formula.cat_tot(2), 0.0);

    let report = screen_cations(&formula, &preset.check(0.01));
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.success_count(), 2);

    let sites = SiteScheme::CpxMorimoto.assign(&formula).unwrap();
    for row in 0..2 {
        assert!((sites.site_total(row, "T").unwrap() - 2.0).abs() < 1e-9);
        assert!(sites.vacancy(row, "M2").unwrap() >= 0.0);
    }

    let endmembers = EndmemberCalc::CpxDietrich.calculate(&formula).unwrap();
    assert_eq!(endmembers.len(), 3);
    assert_eq!(endmembers.endmembers(), DIETRICH_ENDMEMBERS);

    let decomposition = dietrich_decomposition().unwrap();
    let tetrahedral = SiteAllocator::new(vec![Site::new("T", 2.0, &["Si", "Al", "Fe3", "Cr"])])
        .unwrap()
        .allocate(&formula)
        .unwrap();
    for row in 0..2 {
        let proportions: Vec<f64> = DIETRICH_ENDMEMBERS
            .iter()
            .map(|name| endmembers.get(row, name).unwrap())
            .collect();
        assert!(proportions.iter().all(|p| p.is_finite()));

        // augite: the quadrilateral components carry most of the formula
        let quad: f64 = ["Wo", "En", "Fs"]
            .iter()
            .map(|name| endmembers.get(row, name).unwrap())
            .sum();
        let others: f64 = DIETRICH_ENDMEMBERS
            .iter()
            .filter(|name| !["Wo", "En", "Fs"].contains(name))
            .map(|name| endmembers.get(row, name).unwrap().abs())
            .sum();
        assert!(quad > 0.8, "row {row}: quadrilateral sum {quad}");
        assert!(quad > 2.0 * others, "row {row}: {quad} vs {others}");
        assert!((endmembers.get(row, "En").unwrap() - formula.get_or_zero(row, "Mg") / 2.0).abs() < 1e-9);
        assert!((endmembers.get(row, "Fs").unwrap() - formula.get_or_zero(row, "Fe2") / 2.0).abs() < 1e-9);

        let rem = |label: &str| tetrahedral.remainder(row, "T", label).unwrap_or(0.0);
        let cation = |label: &str| formula.get_or_zero(row, label);
        let occupancy = [
            tetrahedral.assigned(row, "T", "Al"),
            tetrahedral.assigned(row, "T", "Cr"),
            rem("Al"),
            cation("Ti"),
            rem("Cr"),
            cation("Fe3"),
            cation("Mn"),
            cation("Fe2"),
            cation("Mg"),
            cation("Ca"),
            cation("Na") + cation("K"),
        ];
        let recovered = decomposition.recompose(&proportions).unwrap();
        for (component, (expected, actual)) in DIETRICH_COMPONENTS
            .iter()
            .zip(occupancy.iter().zip(&recovered))
        {
            assert!(
                (expected - actual).abs() < 1e-6,
                "row {row}: {component} expected {expected}, recovered {actual}"
            );
        }
    }
    assert!(DIETRICH_ENDMEMBERS
        .iter()
        .all(|name| endmembers.get(2, name).map_or(true, |p| p == 0.0)));

    let output = dir.path().join("sites.parquet");
    let parameters = serde_json::json!({ "mineral": preset, "scheme": SiteScheme::CpxMorimoto });
    let stats = write_path(&output, &sites, &WriterConfig::default(), &parameters).unwrap();
    assert_eq!(stats.rows_written, 3);

    let reader = SerializedFileReader::new(File::open(&output).unwrap()).unwrap();
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 3);
    let stored = metadata
        .key_value_metadata()
        .and_then(|kv| kv.iter().find(|e| e.key == PARAMETERS_KEY))
        .and_then(|e| e.value.clone())
        .unwrap();
    assert!(stored.contains("cpx-morimoto"));

    let csv_output = dir.path().join("endmembers.csv");
    write_path(&csv_output, &endmembers, &WriterConfig::default(), &parameters).unwrap();
    let text = fs::read_to_string(&csv_output).unwrap();
    assert!(text.starts_with("id,Jd,Ae,"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_reference_table_from_csv() {
    let csv = "oxide,molar_mass,cation_count,oxygen_count,cation_label\n\
               SiO2,60.0843,1,2,Si\n\
               MgO,40.3044,1,1,Mg\n";
    let table = OxideReferenceTable::from_csv_reader(csv.as_bytes()).unwrap();
    let analyses = vec![Analysis::new("fo").with("SiO2", 42.71).with("MgO", 57.29)];

    assert!(AnalysisDataset::new(&table, &OLIVINE_SCOPE, analyses.clone()).is_err());
    let dataset = AnalysisDataset::new(&table, &["SiO2", "MgO"], analyses).unwrap();
    let formula = StoichiometryEngine::new(&table)
        .cations(&dataset, 4.0, HeaderStyle::Cation)
        .unwrap();
    assert!((formula.cat_tot(0) - 3.0).abs() < 0.01);
}
