//! State shared by every subcommand: reference table, presets, input and
//! output settings, merged from flags, the config file and built-in defaults.

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

use probecalc::dataset::AnalysisDataset;
use probecalc::ingest::{read_analyses_path, IngestOptions};
use probecalc::minerals::{MineralPreset, MineralRegistry};
use probecalc::reference::OxideReferenceTable;
use probecalc::stoich::DEFAULT_WIGGLE;
use probecalc::table::TabularOutput;
use probecalc::writer::{write_csv, write_path, WriterConfig};

use super::config::Config;

/// Flags every subcommand accepts.
#[derive(Debug, Default, Clone)]
pub struct SharedArgs {
    pub config: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub id_column: Option<String>,
}

/// Mineral selection flags.
#[derive(Debug, Default, Clone)]
pub struct MineralArgs {
    pub mineral: Option<String>,
    pub oxides: Option<Vec<String>>,
    pub afu: Option<f64>,
    pub cfu: Option<f64>,
}

pub struct Session {
    pub table: OxideReferenceTable,
    pub registry: MineralRegistry,
    pub ingest: IngestOptions,
    pub writer: WriterConfig,
    pub wiggle: f64,
}

impl Session {
    pub fn load(args: &SharedArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let reference = args.reference.as_ref().or(config.defaults.reference.as_ref());
        let table = match reference {
            Some(path) => OxideReferenceTable::from_csv_path(path).with_context(|| {
                format!("Failed to load oxide reference table: {}", path.display())
            })?,
            None => OxideReferenceTable::standard(),
        };
        info!("Reference table: {} oxides", table.len());

        let mut ingest = IngestOptions::default();
        if let Some(markers) = &config.defaults.missing_markers {
            ingest = ingest.with_missing_markers(markers.as_slice());
        }
        if let Some(column) = args.id_column.as_ref().or(config.defaults.id_column.as_ref()) {
            ingest = ingest.with_id_column(column.clone());
        }

        Ok(Self {
            table,
            registry: config.registry(),
            ingest,
            writer: config.writer_config()?,
            wiggle: config.defaults.wiggle.unwrap_or(DEFAULT_WIGGLE),
        })
    }

    /// Resolve the mineral preset from `--mineral`, `--oxides`, `--afu` and
    /// `--cfu`; explicit values override the named preset.
    pub fn preset(&self, args: &MineralArgs, fallback: Option<&str>) -> Result<MineralPreset> {
        let name = args.mineral.as_deref().or(fallback);
        let base = match name {
            Some(name) => Some(self.registry.get(name).ok_or_else(|| {
                anyhow!(
                    "Unknown mineral: {name}. Valid options: {}",
                    self.registry.names().join(", ")
                )
            })?),
            None => None,
        };

        let oxides = match (&args.oxides, &base) {
            (Some(oxides), _) => oxides.clone(),
            (None, Some(base)) => base.oxides.clone(),
            (None, None) => bail!("Either --mineral or --oxides is required"),
        };
        let afu = args
            .afu
            .or(base.as_ref().map(|b| b.afu))
            .context("--afu is required without --mineral")?;
        let cfu = args
            .cfu
            .or(base.as_ref().map(|b| b.cfu))
            .context("--cfu is required without --mineral")?;

        Ok(MineralPreset {
            name: base.map(|b| b.name).unwrap_or_else(|| "custom".to_string()),
            oxides,
            afu,
            cfu,
        })
    }

    pub fn read(&self, input: &Path, preset: &MineralPreset) -> Result<AnalysisDataset> {
        let dataset = read_analyses_path(input, &self.table, &preset.oxides, &self.ingest)
            .with_context(|| format!("Failed to read analyses: {}", input.display()))?;
        info!(
            "Read {} analyses from {} ({})",
            dataset.len(),
            input.display(),
            preset.name
        );
        Ok(dataset)
    }

    /// Write to `output` (format from its extension) or as CSV to stdout.
    pub fn emit<T, P>(&self, table: &T, output: Option<&Path>, parameters: &P) -> Result<()>
    where
        T: TabularOutput + ?Sized,
        P: Serialize + ?Sized,
    {
        match output {
            Some(path) => {
                let stats = write_path(path, table, &self.writer, parameters)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("{stats} to {}", path.display());
            }
            None => {
                write_csv(io::stdout().lock(), table, &self.writer)
                    .context("Failed to write CSV to stdout")?;
            }
        }
        Ok(())
    }
}
