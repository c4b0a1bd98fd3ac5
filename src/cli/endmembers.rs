use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

use probecalc::endmembers::EndmemberCalc;
use probecalc::stoich::{HeaderStyle, StoichiometryEngine};

use super::session::{MineralArgs, Session};
use super::{fe3, Fe3MethodArg};

/// Endmember proportions from the cation formula
pub fn run(
    session: &Session,
    input: PathBuf,
    calc: EndmemberCalc,
    fe3_method: Option<Fe3MethodArg>,
    mineral: MineralArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let preset = session.preset(&mineral, Some(calc.mineral()))?;
    let mut dataset = session.read(&input, &preset)?;
    if let Some(method) = fe3_method {
        dataset = fe3::estimate(session, &dataset, method, &preset)?.into_dataset();
    }

    let formula = StoichiometryEngine::new(&session.table)
        .cations(&dataset, preset.afu, HeaderStyle::Cation)
        .context("Failed to calculate cations")?;
    let endmembers = calc
        .calculate(&formula)
        .with_context(|| format!("Endmember calculation ({calc}) failed"))?;

    let parameters = json!({
        "command": "endmembers",
        "mineral": preset,
        "calc": calc,
        "fe3": fe3_method.map(|m| m.method(&preset)),
    });
    session.emit(&endmembers, output.as_deref(), &parameters)
}
