use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plugdock_core::UpdatePolicy;
use plugdock_installer::default_user_prefix;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliConfig {
    pub catalog_url: String,
    pub api_level: u32,
    pub testing_channel: bool,
    pub store_root: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://plugins.plugdock.dev".to_string(),
            api_level: 1,
            testing_channel: false,
            store_root: None,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_user_prefix()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<CliConfig> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CliConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed reading config: {}", path.display()));
        }
    };

    toml::from_str(&raw).with_context(|| format!("failed parsing config: {}", path.display()))
}

#[derive(Debug, Clone)]
pub struct FileBackedPolicy {
    path: PathBuf,
}

impl FileBackedPolicy {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UpdatePolicy for FileBackedPolicy {
    fn testing_channel_enabled(&self) -> bool {
        match load_config(&self.path) {
            Ok(config) => config.testing_channel,
            Err(err) => {
                warn!("failed re-reading update policy, testing channel stays off: {err:#}");
                false
            }
        }
    }
}
