//! # Data-Quality Screening
//!
//! Flags suspect analyses without removing them. A cation total outside the
//! acceptance window, or Si outside an expected range, is a warning. An
//! analysis with no measured in-scope oxide is a failure: it has no formula.

mod report;

pub use report::{CheckStatus, QualityCheck, QualityReport};

use crate::stoich::{CationCheck, CationFormula};

/// Screening parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScreen {
    /// Cation-total window
    pub check: CationCheck,
    /// Expected Si range in cations per formula unit, if any
    pub silicon: Option<(f64, f64)>,
}

impl QualityScreen {
    /// Screen on the cation total only
    pub fn new(check: CationCheck) -> Self {
        Self {
            check,
            silicon: None,
        }
    }

    /// Also flag Si outside `[low, high]`
    pub fn with_silicon(mut self, low: f64, high: f64) -> Self {
        self.silicon = Some((low, high));
        self
    }

    /// Screen every analysis of a cation formula
    pub fn run(&self, subject: impl Into<String>, formula: &CationFormula) -> QualityReport {
        let mut report = QualityReport::new(subject);
        let (lower, upper) = self.check.bounds();

        for (row, id) in formula.ids().iter().enumerate() {
            if formula.table().row(row).iter().all(Option::is_none) {
                report.add_check(QualityCheck::failed(id, "no measured in-scope oxides"));
                continue;
            }

            let mut problems = Vec::new();
            let total = formula.cat_tot(row);
            if !self.check.accepts(total) {
                problems.push(format!(
                    "cation total {total:.4} outside [{lower:.4}, {upper:.4}]"
                ));
            }
            if let Some((low, high)) = self.silicon {
                let si = formula.get_or_zero(row, "Si");
                if !(low..=high).contains(&si) {
                    problems.push(format!("Si {si:.4} outside [{low}, {high}]"));
                }
            }

            if problems.is_empty() {
                report.add_check(QualityCheck::ok(id));
            } else {
                report.add_check(QualityCheck::warning(id, problems.join("; ")));
            }
        }

        report
    }
}

/// Screen a cation formula on its cation total
pub fn screen_cations(formula: &CationFormula, check: &CationCheck) -> QualityReport {
    QualityScreen::new(*check).run("cation totals", formula)
}
