use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use plugdock_core::{parse_version, PluginDefinition};
use semver::Version;
use tracing::warn;

use crate::layout::StoreLayout;
use crate::markers::{read_markers, set_disabled, MarkerState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: Option<Version>,
    pub dir_name: String,
    pub path: PathBuf,
    pub markers: MarkerState,
}

pub fn installed_plugins(layout: &StoreLayout) -> Result<Vec<String>> {
    let root = layout.root();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("failed to read store root: {}", root.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    names.sort();
    Ok(names)
}

pub fn plugin_versions(layout: &StoreLayout, internal_name: &str) -> Result<Vec<InstalledVersion>> {
    let plugin_dir = layout.plugin_dir(internal_name);
    if !plugin_dir.exists() {
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in fs::read_dir(&plugin_dir)
        .with_context(|| format!("failed to read plugin dir: {}", plugin_dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().to_string();
        let version = parse_version(&dir_name);
        if version.is_none() {
            warn!(plugin = internal_name, dir = %dir_name, "unparseable version directory name");
        }
        let path = entry.path();
        let markers = read_markers(&path);
        versions.push(InstalledVersion {
            version,
            dir_name,
            path,
            markers,
        });
    }

    versions.sort_by(|left, right| {
        left.version
            .cmp(&right.version)
            .then_with(|| left.dir_name.cmp(&right.dir_name))
    });
    Ok(versions)
}

pub fn newest_parseable_version(versions: &[InstalledVersion]) -> Option<&InstalledVersion> {
    versions
        .iter()
        .rev()
        .find(|installed| installed.version.is_some())
}

pub fn plugin_fully_disabled(versions: &[InstalledVersion]) -> bool {
    !versions.is_empty()
        && versions
            .iter()
            .all(|installed| installed.markers.disabled)
}

pub fn disable_all_versions(layout: &StoreLayout, internal_name: &str) -> Result<()> {
    for installed in plugin_versions(layout, internal_name)? {
        set_disabled(&installed.path).with_context(|| {
            format!(
                "failed to disable version '{}' of plugin '{}'",
                installed.dir_name, internal_name
            )
        })?;
    }
    Ok(())
}

pub fn read_local_manifest(
    layout: &StoreLayout,
    internal_name: &str,
    version: &str,
) -> Result<Option<PluginDefinition>> {
    let path = layout.manifest_path(internal_name, version);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read local manifest: {}", path.display()));
        }
    };

    let definition = PluginDefinition::from_json_str(&raw)
        .with_context(|| format!("failed to parse local manifest: {}", path.display()))?;
    Ok(Some(definition))
}

pub fn write_local_manifest(
    layout: &StoreLayout,
    definition: &PluginDefinition,
    version: &str,
) -> Result<()> {
    let path = layout.manifest_path(&definition.internal_name, version);
    let content = serde_json::to_string_pretty(definition)
        .with_context(|| format!("failed to serialize local manifest: {}", path.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write local manifest: {}", path.display()))
}
