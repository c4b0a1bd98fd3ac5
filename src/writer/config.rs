use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use serde::{Deserialize, Serialize};

/// Compression options for Parquet output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    /// ZSTD compression at the given level
    Zstd(i32),
    /// Snappy compression
    Snappy,
    /// No compression
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

impl CompressionType {
    /// Replace the level of a ZSTD setting; other codecs are unchanged
    pub fn with_level(self, level: i32) -> Self {
        match self {
            Self::Zstd(_) => Self::Zstd(level),
            other => other,
        }
    }

    pub(super) fn to_parquet(self) -> Compression {
        match self {
            Self::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            Self::Snappy => Compression::SNAPPY,
            Self::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

impl FromStr for CompressionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zstd" => Ok(Self::default()),
            "snappy" => Ok(Self::Snappy),
            "none" | "uncompressed" => Ok(Self::Uncompressed),
            _ => Err(format!(
                "Unknown compression: {s}. Valid options: zstd, snappy, none"
            )),
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zstd(level) => write!(f, "zstd({level})"),
            Self::Snappy => f.write_str("snappy"),
            Self::Uncompressed => f.write_str("none"),
        }
    }
}

/// Configuration for table output
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Compression used for Parquet output
    pub compression: CompressionType,

    /// Maximum rows per Parquet row group
    pub row_group_size: usize,

    /// Whether to write column chunk statistics
    pub write_statistics: bool,

    /// Header of the analysis identifier column
    pub id_column: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::default(),
            row_group_size: 64 * 1024,
            write_statistics: true,
            id_column: "id".to_string(),
        }
    }
}

impl WriterConfig {
    /// Replace the compression
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Replace the id column header
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    pub(super) fn to_writer_properties(
        &self,
        metadata: &HashMap<String, String>,
    ) -> WriterProperties {
        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let mut kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();
        kv_metadata.sort_by(|a, b| a.key.cmp(&b.key));

        WriterProperties::builder()
            .set_compression(self.compression.to_parquet())
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size.max(1))
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_parsing() {
        assert_eq!("zstd".parse::<CompressionType>(), Ok(CompressionType::Zstd(3)));
        assert_eq!("Snappy".parse::<CompressionType>(), Ok(CompressionType::Snappy));
        assert_eq!("none".parse::<CompressionType>(), Ok(CompressionType::Uncompressed));
        assert!("lz4".parse::<CompressionType>().is_err());
        assert_eq!(CompressionType::Zstd(3).with_level(9), CompressionType::Zstd(9));
        assert_eq!(CompressionType::Snappy.with_level(9), CompressionType::Snappy);
    }
}
