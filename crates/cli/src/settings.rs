//! Host configuration: defaults, then an optional TOML file, then
//! `ATELIER_*` environment variables. Command line flags are applied last by
//! the caller.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Plain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Identity used as the caller when `--caller` is not given.
    #[serde(default)]
    pub caller: Option<String>,
}

impl HostConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::builder(config_path)?
            .add_source(Environment::with_prefix("ATELIER"))
            .build()?
            .try_deserialize()
            .context("invalid configuration")
    }

    fn builder(
        config_path: Option<&Path>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let mut builder = Config::builder()
            .set_default("data_dir", default_data_dir().to_string_lossy().into_owned())?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?;

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        Ok(builder)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atelier")
}
