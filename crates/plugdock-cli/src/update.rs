use std::path::Path;

use anyhow::Result;
use plugdock_catalog::{CatalogSnapshot, RemoteSource};
use plugdock_core::{PluginDefinition, PluginHost, UpdatePolicy};
use plugdock_installer::{
    disable_all_versions, installed_plugins, newest_parseable_version, plugin_versions,
    read_local_manifest, ArchiveExtractor, Installer, StoreLayout,
};
use plugdock_resolver::{resolve_update, ResolveRequest, UpdateDecision};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub internal_name: String,
    pub display_name: String,
    pub version: String,
    pub installed: bool,
}

// Host stand-in for detached CLI runs: no process is attached, so a plugin
// counts as live when any of its version directories lacks a disabled marker.
pub struct DiskStateHost<'a> {
    pub layout: &'a StoreLayout,
}

impl PluginHost for DiskStateHost<'_> {
    fn load_plugin(&self, _path: &Path, _reason: &str) -> bool {
        true
    }

    fn disable_plugin(&self, _definition: &PluginDefinition) -> Result<()> {
        Ok(())
    }

    fn live_plugins(&self) -> Vec<String> {
        let plugins = match installed_plugins(self.layout) {
            Ok(plugins) => plugins,
            Err(err) => {
                warn!("could not scan the plugin store for live plugins: {err:#}");
                return Vec::new();
            }
        };
        plugins
            .into_iter()
            .filter(|plugin| self.is_plugin_live(plugin))
            .collect()
    }

    fn is_plugin_live(&self, internal_name: &str) -> bool {
        match plugin_versions(self.layout, internal_name) {
            Ok(versions) => versions.iter().any(|installed| !installed.markers.disabled),
            Err(err) => {
                warn!(
                    plugin = internal_name,
                    "could not read marker state: {err:#}"
                );
                false
            }
        }
    }
}

pub struct UpdatePass<'a> {
    pub layout: &'a StoreLayout,
    pub snapshot: &'a CatalogSnapshot,
    pub remote: &'a dyn RemoteSource,
    pub host: &'a dyn PluginHost,
    pub policy: &'a dyn UpdatePolicy,
    pub extractor: &'a dyn ArchiveExtractor,
    pub host_api_level: u32,
}

impl UpdatePass<'_> {
    pub fn run(&self, dry_run: bool) -> (bool, Vec<UpdateOutcome>) {
        let mut all_succeeded = true;
        let mut outcomes = Vec::new();

        let plugins = match installed_plugins(self.layout) {
            Ok(plugins) => plugins,
            Err(err) => {
                warn!("update pass could not scan the plugin store: {err:#}");
                return (false, outcomes);
            }
        };

        for plugin in plugins {
            match self.process_plugin(&plugin, dry_run) {
                Ok(Some(outcome)) => {
                    if !dry_run && !outcome.installed {
                        all_succeeded = false;
                    }
                    outcomes.push(outcome);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(plugin = %plugin, "update pass failed for plugin: {err:#}");
                    all_succeeded = false;
                }
            }
        }

        (all_succeeded, outcomes)
    }

    fn process_plugin(&self, internal_name: &str, dry_run: bool) -> Result<Option<UpdateOutcome>> {
        let versions = plugin_versions(self.layout, internal_name)?;
        let Some(newest) = newest_parseable_version(&versions) else {
            warn!(
                plugin = internal_name,
                "no parseable version directory, skipping"
            );
            return Ok(None);
        };

        let Some(local) = read_local_manifest(self.layout, internal_name, &newest.dir_name)?
        else {
            warn!(
                plugin = internal_name,
                version = %newest.dir_name,
                "local manifest missing, skipping"
            );
            return Ok(None);
        };

        let remote_definition = self.snapshot.find_by_display_name(&local.display_name);
        let decision = resolve_update(&ResolveRequest {
            installed_version: newest.version.clone(),
            remote: remote_definition,
            // policy is re-read for every decision, not cached across the pass
            testing_channel_enabled: self.policy.testing_channel_enabled(),
            host_api_level: self.host_api_level,
        });

        let (channel, target_version) = match decision {
            UpdateDecision::UpToDate => {
                debug!(plugin = internal_name, "up to date");
                return Ok(None);
            }
            UpdateDecision::Skip { reason } => {
                warn!(
                    plugin = internal_name,
                    reason = reason.as_str(),
                    "skipping plugin"
                );
                return Ok(None);
            }
            UpdateDecision::Due {
                channel,
                target_version,
            } => (channel, target_version),
        };

        let Some(remote_definition) = remote_definition else {
            return Ok(None);
        };

        if dry_run {
            return Ok(Some(UpdateOutcome {
                internal_name: internal_name.to_string(),
                display_name: remote_definition.display_name.clone(),
                version: target_version,
                installed: true,
            }));
        }

        let was_enabled = self.host.is_plugin_live(internal_name);
        if was_enabled {
            if let Err(err) = self.host.disable_plugin(&local) {
                warn!(
                    plugin = internal_name,
                    "host disable failed, proceeding with install: {err:#}"
                );
            }
        }

        disable_all_versions(self.layout, internal_name)?;

        let report = Installer::new(self.layout, self.remote, self.host)
            .with_extractor(self.extractor)
            .install(remote_definition, channel, was_enabled);

        Ok(Some(UpdateOutcome {
            internal_name: internal_name.to_string(),
            display_name: remote_definition.display_name.clone(),
            version: target_version,
            installed: report.installed,
        }))
    }
}
