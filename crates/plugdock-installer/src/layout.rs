use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[cfg(target_os = "windows")]
pub const BINARY_EXTENSION: &str = "dll";
#[cfg(target_os = "macos")]
pub const BINARY_EXTENSION: &str = "dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const BINARY_EXTENSION: &str = "so";

pub const DISABLED_MARKER: &str = ".disabled";
pub const TESTING_MARKER: &str = ".testing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn plugin_dir(&self, internal_name: &str) -> PathBuf {
        self.root.join(internal_name)
    }

    pub fn version_dir(&self, internal_name: &str, version: &str) -> PathBuf {
        self.plugin_dir(internal_name).join(version)
    }

    pub fn binary_path(&self, internal_name: &str, version: &str) -> PathBuf {
        self.version_dir(internal_name, version)
            .join(format!("{internal_name}.{BINARY_EXTENSION}"))
    }

    pub fn manifest_path(&self, internal_name: &str, version: &str) -> PathBuf {
        self.version_dir(internal_name, version)
            .join(format!("{internal_name}.json"))
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create store root: {}", self.root.display()))
    }
}

pub fn default_store_root() -> Result<PathBuf> {
    Ok(default_user_prefix()?.join("plugins"))
}

pub fn default_user_prefix() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows user prefix")?;
        return Ok(PathBuf::from(app_data).join("Plugdock"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user prefix")?;
    Ok(PathBuf::from(home).join(".plugdock"))
}
