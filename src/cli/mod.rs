use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use probecalc::endmembers::EndmemberCalc;
use probecalc::ferric::{AmphiboleVariant, Fe3Method};
use probecalc::minerals::MineralPreset;
use probecalc::sites::SiteScheme;

mod cations;
mod config;
mod endmembers;
mod fe3;
mod oxides;
mod session;
mod sites;

use session::{MineralArgs, Session, SharedArgs};

/// probecalc - Stoichiometric recalculation of microprobe mineral analyses
#[derive(Parser)]
#[command(name = "probecalc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Oxide reference table CSV (defaults to the built-in table)
    #[arg(long, value_name = "FILE", global = true)]
    reference: Option<PathBuf>,

    /// Column holding analysis identifiers (row numbers when omitted)
    #[arg(long, value_name = "COLUMN", global = true)]
    id_column: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Mineral selection shared by the recalculation commands.
#[derive(Args, Debug, Clone, Default)]
struct MineralOpts {
    /// Mineral preset (olivine, feldspar, clinopyroxene, amphibole, spinel, or a config entry)
    #[arg(short, long)]
    mineral: Option<String>,

    /// Comma-separated oxide scope, overriding the preset
    #[arg(long, value_delimiter = ',')]
    oxides: Option<Vec<String>>,

    /// Anions per formula unit, overriding the preset
    #[arg(long)]
    afu: Option<f64>,

    /// Cations per formula unit, overriding the preset
    #[arg(long)]
    cfu: Option<f64>,
}

impl From<MineralOpts> for MineralArgs {
    fn from(opts: MineralOpts) -> Self {
        MineralArgs {
            mineral: opts.mineral,
            oxides: opts.oxides,
            afu: opts.afu,
            cfu: opts.cfu,
        }
    }
}

/// Fe3+ estimation method.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Fe3MethodArg {
    /// Droop (1987) on the mineral's afu/cfu
    Droop,
    /// Papike et al. (1974) clinopyroxene charge balance
    Papike,
    /// Stormer (1983) spinel charge balance
    Stormer,
    /// Amphibole, 13 cations excluding Ca, Na, K
    #[value(name = "amph-13ecnk")]
    Amph13eCnk,
    /// Amphibole, 15 cations excluding Na, K
    #[value(name = "amph-15enk")]
    Amph15eNk,
    /// Amphibole, 15 cations excluding K
    #[value(name = "amph-15ek")]
    Amph15eK,
}

impl Fe3MethodArg {
    /// The estimator, taking the Droop basis from `preset`.
    pub fn method(self, preset: &MineralPreset) -> Fe3Method {
        match self {
            Fe3MethodArg::Droop => Fe3Method::Droop {
                afu: preset.afu,
                cfu: preset.cfu,
            },
            Fe3MethodArg::Papike => Fe3Method::Papike,
            Fe3MethodArg::Stormer => Fe3Method::Stormer,
            Fe3MethodArg::Amph13eCnk => Fe3Method::Amphibole {
                variant: AmphiboleVariant::ThirteenECNK,
            },
            Fe3MethodArg::Amph15eNk => Fe3Method::Amphibole {
                variant: AmphiboleVariant::FifteenENK,
            },
            Fe3MethodArg::Amph15eK => Fe3Method::Amphibole {
                variant: AmphiboleVariant::FifteenEK,
            },
        }
    }

    /// Mineral preset used when none is given.
    pub fn default_mineral(self) -> Option<&'static str> {
        match self {
            Fe3MethodArg::Droop => None,
            Fe3MethodArg::Papike => Some("clinopyroxene"),
            Fe3MethodArg::Stormer => Some("spinel"),
            _ => Some("amphibole"),
        }
    }
}

/// Site-assignment scheme.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SchemeArg {
    /// Clinopyroxene after Morimoto (1988)
    CpxMorimoto,
    /// Amphibole after Leake et al. (1978)
    AmphLeake1978,
    /// Amphibole after Leake et al. (1997)
    AmphLeake1997,
}

impl From<SchemeArg> for SiteScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::CpxMorimoto => SiteScheme::CpxMorimoto,
            SchemeArg::AmphLeake1978 => SiteScheme::AmphLeake1978,
            SchemeArg::AmphLeake1997 => SiteScheme::AmphLeake1997,
        }
    }
}

/// Endmember calculation.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EndmemberArg {
    /// Fo, Fay, Teph, Mont
    Olivine,
    /// An, Ab, Or
    Feldspar,
    /// Fs, En, Wo
    CpxQuad,
    /// Putirka (2008) components
    CpxPutirka,
    /// Dietrich & Petrakakis (1996) components
    CpxDietrich,
    /// Ferracutti et al. (2014) spinel endmembers
    Spinel,
}

impl From<EndmemberArg> for EndmemberCalc {
    fn from(arg: EndmemberArg) -> Self {
        match arg {
            EndmemberArg::Olivine => EndmemberCalc::Olivine,
            EndmemberArg::Feldspar => EndmemberCalc::Feldspar,
            EndmemberArg::CpxQuad => EndmemberCalc::CpxQuad,
            EndmemberArg::CpxPutirka => EndmemberCalc::CpxPutirka,
            EndmemberArg::CpxDietrich => EndmemberCalc::CpxDietrich,
            EndmemberArg::Spinel => EndmemberCalc::Spinel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Cations per formula unit with the cation-total screen
    Cations {
        /// Input analyses CSV
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        mineral: MineralOpts,

        /// Label columns with oxide symbols instead of cations
        #[arg(long)]
        oxide_headers: bool,

        /// Cation-total tolerance (fraction of cfu)
        #[arg(short, long)]
        wiggle: Option<f64>,

        /// Print a per-analysis quality report to stderr
        #[arg(long)]
        report: bool,

        /// Output file (.csv or .parquet); CSV to stdout when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Estimate Fe3+ from total iron reported as FeO
    Fe3 {
        /// Input analyses CSV
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Estimation method
        #[arg(long, value_enum)]
        method: Fe3MethodArg,

        #[command(flatten)]
        mineral: MineralOpts,

        /// Output file (.csv or .parquet); CSV to stdout when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Allocate cations to crystallographic sites
    Sites {
        /// Input analyses CSV
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Site-assignment scheme
        #[arg(long, value_enum)]
        scheme: SchemeArg,

        /// Estimate Fe3+ first
        #[arg(long, value_enum)]
        fe3: Option<Fe3MethodArg>,

        #[command(flatten)]
        mineral: MineralOpts,

        /// Output file (.csv or .parquet); CSV to stdout when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Endmember proportions
    Endmembers {
        /// Input analyses CSV
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Endmember calculation
        #[arg(long, value_enum)]
        calc: EndmemberArg,

        /// Estimate Fe3+ first
        #[arg(long, value_enum)]
        fe3: Option<Fe3MethodArg>,

        #[command(flatten)]
        mineral: MineralOpts,

        /// Output file (.csv or .parquet); CSV to stdout when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the active oxide reference table
    Oxides,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    fn shared(&self) -> SharedArgs {
        SharedArgs {
            config: self.config.clone(),
            reference: self.reference.clone(),
            id_column: self.id_column.clone(),
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let session = Session::load(&cli.shared())?;

    match cli.command {
        Commands::Cations {
            input,
            mineral,
            oxide_headers,
            wiggle,
            report,
            output,
        } => cations::run(
            &session,
            input,
            mineral.into(),
            oxide_headers,
            wiggle,
            report,
            output,
        ),
        Commands::Fe3 {
            input,
            method,
            mineral,
            output,
        } => fe3::run(&session, input, method, mineral.into(), output),
        Commands::Sites {
            input,
            scheme,
            fe3,
            mineral,
            output,
        } => sites::run(
            &session,
            input,
            SiteScheme::from(scheme),
            fe3,
            mineral.into(),
            output,
        ),
        Commands::Endmembers {
            input,
            calc,
            fe3,
            mineral,
            output,
        } => endmembers::run(
            &session,
            input,
            EndmemberCalc::from(calc),
            fe3,
            mineral.into(),
            output,
        ),
        Commands::Oxides => oxides::run(&session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fe3_variants() {
        let cli = Cli::try_parse_from([
            "probecalc",
            "fe3",
            "in.csv",
            "--method",
            "amph-15enk",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 1);
        match cli.command {
            Commands::Fe3 { method, .. } => {
                assert!(matches!(method, Fe3MethodArg::Amph15eNk));
                assert_eq!(method.default_mineral(), Some("amphibole"));
            }
            _ => panic!("expected fe3"),
        }
    }

    #[test]
    fn test_parse_oxide_list() {
        let cli = Cli::try_parse_from([
            "probecalc",
            "cations",
            "in.csv",
            "--oxides",
            "SiO2,MgO,FeO",
            "--afu",
            "4",
            "--cfu",
            "3",
            "--id-column",
            "Sample",
        ])
        .unwrap();
        assert_eq!(cli.shared().id_column.as_deref(), Some("Sample"));
        match cli.command {
            Commands::Cations { mineral, .. } => {
                assert_eq!(mineral.oxides.map(|o| o.len()), Some(3));
                assert_eq!(mineral.afu, Some(4.0));
            }
            _ => panic!("expected cations"),
        }
    }
}
