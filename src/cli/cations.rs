use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

use probecalc::quality::QualityScreen;
use probecalc::stoich::{CationCheck, HeaderStyle, StoichiometryEngine};

use super::session::{MineralArgs, Session};

/// Cations per formula unit with `cat_tot` and `cat_good`
pub fn run(
    session: &Session,
    input: PathBuf,
    mineral: MineralArgs,
    oxide_headers: bool,
    wiggle: Option<f64>,
    report: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let preset = session.preset(&mineral, None)?;
    let dataset = session.read(&input, &preset)?;
    let check = CationCheck::new(preset.cfu).with_wiggle(wiggle.unwrap_or(session.wiggle));
    check.validate().context("Invalid cation-total check")?;
    let headers = if oxide_headers {
        HeaderStyle::Oxide
    } else {
        HeaderStyle::Cation
    };

    let engine = StoichiometryEngine::new(&session.table);
    let formula = match headers {
        HeaderStyle::Cation => engine.check_cations(&dataset, preset.afu, &check),
        HeaderStyle::Oxide => engine
            .cations(&dataset, preset.afu, headers)
            .map(|f| f.with_check(&check)),
    }
    .context("Failed to calculate cations")?;

    if report {
        let mut screen = QualityScreen::new(check);
        if preset.name == "clinopyroxene" {
            screen = screen.with_silicon(1.0, 2.0);
        }
        let quality = screen.run(input.display().to_string(), &formula);
        eprintln!("{}", quality.format_colored());
    }

    let parameters = json!({
        "command": "cations",
        "mineral": preset,
        "headers": headers,
        "check": check,
    });
    session.emit(&formula, output.as_deref(), &parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::SharedArgs;
    use std::fs;
    use tempfile::tempdir;

    fn olivine() -> MineralArgs {
        MineralArgs {
            mineral: Some("olivine".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_wiggle_rejected_for_both_header_styles() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ol.csv");
        fs::write(&input, "SiO2,FeO,MgO\n40.8,9.1,49.6\n").unwrap();
        let session = Session::load(&SharedArgs::default()).unwrap();

        for oxide_headers in [false, true] {
            for wiggle in [-0.1, f64::NAN] {
                let output = dir.path().join("out.csv");
                let result = run(
                    &session,
                    input.clone(),
                    olivine(),
                    oxide_headers,
                    Some(wiggle),
                    false,
                    Some(output),
                );
                assert!(result.is_err(), "wiggle {wiggle} accepted (oxide headers: {oxide_headers})");
            }
        }

        let output = dir.path().join("ok.csv");
        run(&session, input, olivine(), true, Some(0.01), false, Some(output.clone())).unwrap();
        let written = fs::read_to_string(output).unwrap();
        assert!(written.starts_with("id,SiO2,FeO,Cr2O3,MgO"));
        assert!(written.contains("cat_good"));
    }
}
