//! TOML configuration file support.
//!
//! ```toml
//! # probecalc.toml
//! [defaults]
//! wiggle = 0.01
//! reference = "oxides.csv"
//! id_column = "Sample"
//! missing_markers = ["<", "-", "bdl"]
//!
//! [output]
//! compression = "zstd"
//! compression_level = 3
//!
//! [minerals.garnet]
//! oxides = ["SiO2", "TiO2", "Al2O3", "FeO", "MnO", "MgO", "CaO"]
//! afu = 12.0
//! cfu = 8.0
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use probecalc::minerals::{MineralPreset, MineralRegistry};
use probecalc::writer::{CompressionType, WriterConfig};

/// Root configuration structure for probecalc.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Defaults shared by every command.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// User-defined mineral presets keyed by name.
    #[serde(default)]
    pub minerals: BTreeMap<String, MineralPreset>,
}

/// Defaults shared by every command.
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Cation-total tolerance.
    pub wiggle: Option<f64>,

    /// Oxide reference table CSV.
    pub reference: Option<PathBuf>,

    /// Column holding analysis identifiers.
    pub id_column: Option<String>,

    /// Cell texts read as missing.
    pub missing_markers: Option<Vec<String>>,
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// zstd, snappy or none.
    pub compression: Option<String>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Built-in presets overlaid with the `[minerals.*]` tables.
    pub fn registry(&self) -> MineralRegistry {
        let mut registry = MineralRegistry::default();
        for (name, preset) in &self.minerals {
            let mut preset = preset.clone();
            preset.name = name.clone();
            registry.insert(preset);
        }
        registry
    }

    /// Writer configuration from the `[output]` table.
    pub fn writer_config(&self) -> Result<WriterConfig> {
        let mut compression = match &self.output.compression {
            Some(name) => name.parse::<CompressionType>().map_err(|e| anyhow!(e))?,
            None => CompressionType::default(),
        };
        if let Some(level) = self.output.compression_level {
            compression = compression.with_level(level);
        }
        Ok(WriterConfig::default().with_compression(compression))
    }
}
