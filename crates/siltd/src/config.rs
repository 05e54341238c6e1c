//! TOML configuration for the silt daemon.
//!
//! Every section is optional; [`CliConfig::load`] without a file returns
//! the defaults (1 MiB chunks, file-backed store under `~/.silt`).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use silt_types::{DEFAULT_CHUNK_SIZE, EngineConfig};

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Block storage backend.
    pub store: StoreSection,
    /// Split and reassembly tuning.
    pub engine: EngineSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[store]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Backend type: `"file"` (default) or `"memory"`.
    pub backend: String,
    /// Directory for persistent block data.
    pub data_dir: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(".silt"))
            .unwrap_or_else(|| PathBuf::from(".silt"));
        Self {
            backend: "file".to_string(),
            data_dir,
        }
    }
}

/// `[engine]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Chunk size, human-readable (`"1MB"`, `"256KB"`) or raw bytes.
    pub chunk_size: Option<String>,
    /// Concurrent block writes during a split.
    pub put_concurrency: Option<usize>,
    /// Concurrent block reads during a reassembly.
    pub fetch_concurrency: Option<usize>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective chunk size in bytes (config value or 1 MiB default).
    ///
    /// Fails on unparseable or zero sizes so a bad `-s`/config value is
    /// reported instead of reaching the chunker.
    pub fn chunk_size(&self) -> anyhow::Result<u32> {
        match self.engine.chunk_size.as_deref() {
            Some(s) => parse_size(s),
            None => Ok(DEFAULT_CHUNK_SIZE),
        }
    }

    /// Effective number of concurrent block writes. Defaults to 8.
    pub fn put_concurrency(&self) -> usize {
        self.engine.put_concurrency.unwrap_or(8)
    }

    /// Effective number of concurrent block reads. Defaults to 8.
    pub fn fetch_concurrency(&self) -> usize {
        self.engine.fetch_concurrency.unwrap_or(8)
    }

    /// Engine tuning assembled from the effective values.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        Ok(EngineConfig {
            chunk_size: self.chunk_size()?,
            put_concurrency: self.put_concurrency(),
            fetch_concurrency: self.fetch_concurrency(),
        })
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports: `"1MB"`, `"256KB"`, `"1GB"`, `"1048576"` (raw bytes).
/// Zero, unparseable, and overflowing sizes are errors.
fn parse_size(s: &str) -> anyhow::Result<u32> {
    let trimmed = s.trim();
    let (num, multiplier) = if let Some(num) = trimmed.strip_suffix("GB") {
        (num, 1_073_741_824u32)
    } else if let Some(num) = trimmed.strip_suffix("MB") {
        (num, 1_048_576)
    } else if let Some(num) = trimmed.strip_suffix("KB") {
        (num, 1_024)
    } else {
        (trimmed, 1)
    };

    let value: u32 = num
        .trim()
        .parse()
        .with_context(|| format!("invalid size {s:?} (expected e.g. \"1MB\" or raw bytes)"))?;
    let bytes = value
        .checked_mul(multiplier)
        .with_context(|| format!("size {s:?} does not fit in 32 bits"))?;
    anyhow::ensure!(bytes > 0, "chunk size must be at least 1 byte, got {s:?}");
    Ok(bytes)
}
