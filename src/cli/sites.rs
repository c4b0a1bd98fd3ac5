use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

use probecalc::sites::SiteScheme;
use probecalc::stoich::{HeaderStyle, StoichiometryEngine};

use super::session::{MineralArgs, Session};
use super::{fe3, Fe3MethodArg};

fn scheme_mineral(scheme: SiteScheme) -> &'static str {
    match scheme {
        SiteScheme::CpxMorimoto => "clinopyroxene",
        _ => "amphibole",
    }
}

/// Allocate cations on the scheme's anion basis to its sites
pub fn run(
    session: &Session,
    input: PathBuf,
    scheme: SiteScheme,
    fe3_method: Option<Fe3MethodArg>,
    mineral: MineralArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let preset = session.preset(&mineral, Some(scheme_mineral(scheme)))?;
    let mut dataset = session.read(&input, &preset)?;
    if let Some(method) = fe3_method {
        dataset = fe3::estimate(session, &dataset, method, &preset)?.into_dataset();
    }

    let formula = StoichiometryEngine::new(&session.table)
        .cations(&dataset, scheme.afu(), HeaderStyle::Cation)
        .context("Failed to calculate cations")?;
    let assignment = scheme
        .assign(&formula)
        .with_context(|| format!("Site assignment ({scheme}) failed"))?;

    let parameters = json!({
        "command": "sites",
        "mineral": preset,
        "scheme": scheme,
        "fe3": fe3_method.map(|m| m.method(&preset)),
    });
    session.emit(&assignment, output.as_deref(), &parameters)
}
