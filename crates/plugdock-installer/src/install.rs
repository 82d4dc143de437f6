use std::fs;

use anyhow::{anyhow, Context, Result};
use plugdock_catalog::RemoteSource;
use plugdock_core::{PluginDefinition, PluginHost, ReleaseChannel};
use tracing::{info, warn};

use crate::extract::{ArchiveExtractor, CommandExtractor};
use crate::layout::StoreLayout;
use crate::markers::{clear_disabled, clear_testing, set_disabled, set_testing};
use crate::scan::write_local_manifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: bool,
}

pub struct Installer<'a> {
    layout: &'a StoreLayout,
    remote: &'a dyn RemoteSource,
    host: &'a dyn PluginHost,
    extractor: &'a dyn ArchiveExtractor,
}

impl<'a> Installer<'a> {
    pub fn new(
        layout: &'a StoreLayout,
        remote: &'a dyn RemoteSource,
        host: &'a dyn PluginHost,
    ) -> Self {
        static DEFAULT_EXTRACTOR: CommandExtractor = CommandExtractor;
        Self {
            layout,
            remote,
            host,
            extractor: &DEFAULT_EXTRACTOR,
        }
    }

    pub fn with_extractor(mut self, extractor: &'a dyn ArchiveExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn install(
        &self,
        definition: &PluginDefinition,
        channel: ReleaseChannel,
        enable_after_install: bool,
    ) -> InstallReport {
        match self.try_install(definition, channel, enable_after_install) {
            Ok(installed) => InstallReport { installed },
            Err(err) => {
                warn!(
                    plugin = %definition.internal_name,
                    channel = channel.as_str(),
                    "install failed: {err:#}"
                );
                InstallReport { installed: false }
            }
        }
    }

    fn try_install(
        &self,
        definition: &PluginDefinition,
        channel: ReleaseChannel,
        enable_after_install: bool,
    ) -> Result<bool> {
        let internal_name = definition.internal_name.as_str();

        // the per-plugin manifest may have advanced since the catalog fetch;
        // it supersedes the catalog copy for this one operation
        let raw = self
            .remote
            .fetch_manifest(channel, internal_name)
            .with_context(|| format!("manifest re-fetch failed for plugin '{internal_name}'"))?;
        let fresh = PluginDefinition::from_json_str(&raw)
            .with_context(|| format!("manifest re-parse failed for plugin '{internal_name}'"))?;

        let version = fresh
            .channel_version(channel.is_testing())
            .ok_or_else(|| {
                anyhow!(
                    "plugin '{internal_name}' has no {} version published",
                    channel.as_str()
                )
            })?
            .to_string();

        let version_dir = self.layout.version_dir(internal_name, &version);
        let binary_path = self.layout.binary_path(internal_name, &version);

        if binary_path.exists() {
            if !enable_after_install {
                return Ok(true);
            }
            clear_disabled(&version_dir)?;
            return Ok(self.host.load_plugin(&binary_path, "reinstall"));
        }

        let is_update = self.layout.plugin_dir(internal_name).exists();

        if version_dir.exists() {
            // leftovers from a failed attempt are always safe to discard
            fs::remove_dir_all(&version_dir).with_context(|| {
                format!(
                    "failed to replace stale version dir: {}",
                    version_dir.display()
                )
            })?;
        }
        fs::create_dir_all(&version_dir).with_context(|| {
            format!("failed to create version dir: {}", version_dir.display())
        })?;

        let bytes = self
            .remote
            .download_artifact(internal_name, is_update, channel)
            .with_context(|| format!("artifact download failed for plugin '{internal_name}'"))?;

        let archive_path = version_dir.join(format!("{internal_name}.pkg.part"));
        fs::write(&archive_path, &bytes).with_context(|| {
            format!("failed to write plugin package: {}", archive_path.display())
        })?;
        self.extractor
            .extract(&archive_path, &version_dir)
            .with_context(|| format!("extraction failed for plugin '{internal_name}'"))?;
        fs::remove_file(&archive_path).with_context(|| {
            format!("failed to remove plugin package: {}", archive_path.display())
        })?;

        if !binary_path.exists() {
            return Err(anyhow!(
                "package for plugin '{internal_name}' did not contain expected binary: {}",
                binary_path.display()
            ));
        }

        write_local_manifest(self.layout, &fresh, &version)?;

        if !enable_after_install {
            set_disabled(&version_dir)?;
            info!(plugin = internal_name, version = %version, "installed disabled");
            return Ok(true);
        }

        if channel.is_testing() {
            set_testing(&version_dir)?;
        } else {
            clear_testing(&version_dir)?;
        }

        info!(plugin = internal_name, version = %version, channel = channel.as_str(), "installed");
        Ok(self.host.load_plugin(&binary_path, "install"))
    }
}
