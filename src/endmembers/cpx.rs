//! Clinopyroxene components beyond the quadrilateral

use super::decomposition::LinearDecomposition;
use super::table::EndmemberTable;
use crate::error::{CalcError, CalcResult};
use crate::sites::{Site, SiteAllocator};
use crate::stoich::CationFormula;
use crate::table::{map_rows, try_map_rows, ResultTable};

const PUTIRKA_COLUMNS: [&str; 9] = [
    "Al_IV", "Al_VI", "Fe3", "Jd", "CaTs", "CaTi", "CrCaTs", "DiHd", "EnFs",
];

/// Occupancy components of the Dietrich & Petrakakis vector
pub const DIETRICH_COMPONENTS: [&str; 11] = [
    "Al_IV", "Cr_IV", "Al_VI", "Ti", "Cr_VI", "Fe3", "Mn", "Fe2", "Mg", "Ca", "Na+K",
];

/// Dietrich & Petrakakis endmembers
pub const DIETRICH_ENDMEMBERS: [&str; 11] = [
    "Jd", "Ae", "Ur", "Ti-Ts", "Ca-Ts", "Fe-Ts", "Cr-Ts", "Pm", "Fs", "En", "Wo",
];

// Rows follow DIETRICH_ENDMEMBERS, columns DIETRICH_COMPONENTS
#[rustfmt::skip]
const DIETRICH_COEFFICIENTS: [[f64; 11]; 11] = [
    // Al4 Cr4  Al6  Ti   Cr6  Fe3  Mn   Fe2  Mg   Ca   NaK
    [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], // Jd   NaAlSi2O6
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], // Ae   NaFe3Si2O6
    [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], // Ur   NaCrSi2O6
    [2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], // Ti-Ts CaTiAl2O6
    [1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], // Ca-Ts CaAlAlSiO6
    [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0, 0.0], // Fe-Ts CaFe3Fe3SiO6
    [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], // Cr-Ts CaCrCrSiO6
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0], // Pm   Mn2Si2O6
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0], // Fs   Fe2Si2O6
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0], // En   Mg2Si2O6
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0], // Wo   Ca2Si2O6
];

/// The Dietrich & Petrakakis (1996) decomposition
pub fn dietrich_decomposition() -> CalcResult<LinearDecomposition> {
    let rows: Vec<&[f64]> = DIETRICH_COEFFICIENTS.iter().map(|r| &r[..]).collect();
    LinearDecomposition::new(&DIETRICH_COMPONENTS, &DIETRICH_ENDMEMBERS, &rows)
}

/// Putirka (2008) sequential clinopyroxene components on 6 oxygens.
///
/// Al_IV fills the tetrahedral site left by Si; Fe3 is the Papike et al.
/// (1974) charge-balance estimate.
pub(crate) fn putirka(formula: &CationFormula) -> CalcResult<EndmemberTable> {
    let tetrahedral = SiteAllocator::new(vec![Site::new("T", 2.0, &["Si", "Al"])])?;
    let sites = tetrahedral.allocate(formula)?;

    let rows = map_rows(formula.len(), |row| {
        let get = |label: &str| formula.get_or_zero(row, label);
        let al_iv = sites.assigned(row, "T", "Al");
        let al_vi = get("Al") - al_iv;
        let fe3 = (get("Na") + al_iv - al_vi - 2.0 * get("Ti") - get("Cr")).max(0.0);

        let jd = get("Na").min(al_vi);
        let cats = al_vi - jd;
        let cati = (al_iv - cats) / 2.0;
        let crcats = get("Cr") / 2.0;
        let dihd = get("Ca") - cati - cats - crcats;
        let enfs = (get("Fe2") + get("Mg") - dihd) / 2.0;

        [al_iv, al_vi, fe3, jd, cats, cati, crcats, dihd, enfs]
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>()
    });

    let names = PUTIRKA_COLUMNS.iter().map(|s| s.to_string()).collect();
    let table = ResultTable::from_parts(formula.table().shared_ids(), names, rows);
    Ok(EndmemberTable::new("cpx-putirka", None, table))
}

/// Dietrich & Petrakakis (1996) eleven-component decomposition.
///
/// Al and Cr not needed to fill the tetrahedral site after Si (and Fe3) sit
/// on M1.
pub(crate) fn dietrich(formula: &CationFormula) -> CalcResult<EndmemberTable> {
    let decomposition = dietrich_decomposition()?;
    let tetrahedral = SiteAllocator::new(vec![Site::new("T", 2.0, &["Si", "Al", "Fe3", "Cr"])])?;
    let sites = tetrahedral.allocate(formula)?;

    let rows = try_map_rows(formula.len(), |row| {
        let get = |label: &str| formula.get_or_zero(row, label);
        let rem = |label: &str| sites.remainder(row, "T", label).unwrap_or(0.0);
        let occupancy = [
            sites.assigned(row, "T", "Al"),
            sites.assigned(row, "T", "Cr"),
            rem("Al"),
            get("Ti"),
            rem("Cr"),
            get("Fe3"),
            get("Mn"),
            get("Fe2"),
            get("Mg"),
            get("Ca"),
            get("Na") + get("K"),
        ];
        let proportions = decomposition.decompose(&occupancy)?;
        Ok::<Vec<Option<f64>>, CalcError>(proportions.into_iter().map(Some).collect())
    })?;

    let names = decomposition.endmembers().to_vec();
    let table = ResultTable::from_parts(formula.table().shared_ids(), names, rows);
    Ok(EndmemberTable::new("cpx-dietrich", None, table))
}
