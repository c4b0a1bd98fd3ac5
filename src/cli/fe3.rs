use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use std::path::PathBuf;

use probecalc::dataset::AnalysisDataset;
use probecalc::ferric::{Fe3EstimationEngine, Fe3Estimate};
use probecalc::minerals::MineralPreset;

use super::session::{MineralArgs, Session};
use super::Fe3MethodArg;

pub(super) fn estimate(
    session: &Session,
    dataset: &AnalysisDataset,
    method: Fe3MethodArg,
    preset: &MineralPreset,
) -> Result<Fe3Estimate> {
    let method = method.method(preset);
    info!("Estimating Fe3+ with {method}");
    Fe3EstimationEngine::new(&session.table)
        .estimate(dataset, &method)
        .with_context(|| format!("Fe3+ estimation ({method}) failed"))
}

/// Estimate Fe3+ and write the recalculated oxides with diagnostics
pub fn run(
    session: &Session,
    input: PathBuf,
    method: Fe3MethodArg,
    mineral: MineralArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let preset = session.preset(&mineral, method.default_mineral())?;
    let dataset = session.read(&input, &preset)?;
    let result = estimate(session, &dataset, method, &preset)?;

    let parameters = json!({
        "command": "fe3",
        "mineral": preset,
        "method": method.method(&preset),
    });
    session.emit(&result, output.as_deref(), &parameters)
}
