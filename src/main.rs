//! # probecalc
//!
//! Command-line front end for stoichiometric recalculation of microprobe
//! analyses.
//!
//! ## Usage
//!
//! ```bash
//! # Olivine formulas on 4 oxygens, screened against 3 cations
//! probecalc cations analyses.csv --mineral olivine -o olivine.parquet
//!
//! # Clinopyroxene Fe3+ by Droop, then Morimoto site allocation
//! probecalc sites cpx.csv --scheme cpx-morimoto --fe3 droop
//!
//! # Endmembers
//! probecalc endmembers feldspar.csv --calc feldspar --id-column Sample
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
