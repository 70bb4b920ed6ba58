//! TOML configuration for the command line tool
//!
//! ```toml
//! [upload]
//! max_files = 10
//! max_file_size = 52428800
//!
//! [output]
//! directory = "out"
//! ```
//!
//! Every table and key is optional.

use anyhow::Context;
use pdftools_core::UploadLimits;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upload: UploadLimits,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where artifacts go when `--output` is not given
    pub directory: Option<PathBuf>,
}

impl Config {
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        anyhow::ensure!(config.upload.max_files > 0, "upload.max_files must be at least 1");
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::default()),
        }
    }
}
