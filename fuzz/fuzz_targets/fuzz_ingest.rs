#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use probecalc::ingest::{read_analyses, IngestOptions};
use probecalc::reference::OxideReferenceTable;
use probecalc::stoich::{CationCheck, StoichiometryEngine};

// Arbitrary CSV must either fail cleanly or recalculate without panicking.
fuzz_target!(|data: &[u8]| {
    let table = OxideReferenceTable::standard();
    let scope = ["SiO2", "Al2O3", "FeO", "MgO", "CaO", "Na2O"];
    let options = IngestOptions::default().with_id_column("id");

    if let Ok(dataset) = read_analyses(Cursor::new(data), &table, &scope, &options) {
        let engine = StoichiometryEngine::new(&table);
        let _ = engine.check_cations(&dataset, 6.0, &CationCheck::new(4.0));
    }
});
