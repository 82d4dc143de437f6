use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::layout::{DISABLED_MARKER, TESTING_MARKER};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerState {
    pub disabled: bool,
    pub testing: bool,
}

pub fn read_markers(version_dir: &Path) -> MarkerState {
    MarkerState {
        disabled: version_dir.join(DISABLED_MARKER).exists(),
        testing: version_dir.join(TESTING_MARKER).exists(),
    }
}

pub fn set_disabled(version_dir: &Path) -> Result<()> {
    touch_marker(version_dir, DISABLED_MARKER)
}

pub fn clear_disabled(version_dir: &Path) -> Result<()> {
    remove_marker(version_dir, DISABLED_MARKER)
}

pub fn set_testing(version_dir: &Path) -> Result<()> {
    touch_marker(version_dir, TESTING_MARKER)
}

pub fn clear_testing(version_dir: &Path) -> Result<()> {
    remove_marker(version_dir, TESTING_MARKER)
}

fn touch_marker(version_dir: &Path, marker: &str) -> Result<()> {
    let path = version_dir.join(marker);
    if path.exists() {
        return Ok(());
    }
    fs::write(&path, b"")
        .with_context(|| format!("failed to create marker: {}", path.display()))
}

fn remove_marker(version_dir: &Path, marker: &str) -> Result<()> {
    let path = version_dir.join(marker);
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(&path)
        .with_context(|| format!("failed to remove marker: {}", path.display()))
}
