use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use plugdock_catalog::{CatalogStore, HttpRemoteSource, RemoteSource};
use plugdock_core::{DetachedHost, PluginDefinition, PluginHost, ReleaseChannel, UpdatePolicy};
use plugdock_installer::{
    cleanup, default_store_root, disable_all_versions, installed_plugins, plugin_fully_disabled,
    plugin_versions, ArchiveExtractor, CommandExtractor, InstallReport, Installer, StoreLayout,
};

use crate::config::{default_config_path, load_config, CliConfig, FileBackedPolicy};
use crate::render::{
    current_output_style, render_outcome_lines, render_status_line, OutputStyle,
};
use crate::update::{DiskStateHost, UpdatePass};
use crate::{Cli, Commands};

struct CliContext {
    config_path: PathBuf,
    config: CliConfig,
    layout: StoreLayout,
    style: OutputStyle,
}

fn build_context(cli: &Cli) -> Result<CliContext> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = load_config(&config_path)?;

    let store_root = match cli.store_root.clone().or_else(|| config.store_root.clone()) {
        Some(root) => root,
        None => default_store_root()?,
    };

    Ok(CliContext {
        config_path,
        config,
        layout: StoreLayout::new(store_root),
        style: current_output_style(),
    })
}

fn refreshed_store(remote: &dyn RemoteSource) -> Result<Arc<plugdock_catalog::CatalogSnapshot>> {
    let store = CatalogStore::new();
    store.refresh_blocking(remote);
    store.current().ok_or_else(|| {
        anyhow!(
            "catalog is unavailable: {}",
            store
                .last_error()
                .unwrap_or_else(|| "no previous snapshot".to_string())
        )
    })
}

pub fn run_cli(cli: Cli) -> Result<()> {
    let context = build_context(&cli)?;

    match cli.command {
        Commands::Refresh => {
            let remote: Arc<dyn RemoteSource> =
                Arc::new(HttpRemoteSource::new(&context.config.catalog_url)?);
            let store = Arc::new(CatalogStore::new());
            let handle = store.refresh(remote);
            let state = handle
                .join()
                .map_err(|_| anyhow!("catalog refresh worker panicked"))?;

            match store.current() {
                Some(snapshot) => {
                    println!(
                        "{}",
                        render_status_line(
                            context.style,
                            true,
                            &format!(
                                "catalog refreshed: {} plugins ({})",
                                snapshot.plugins.len(),
                                state.as_str()
                            ),
                        )
                    );
                }
                None => {
                    return Err(anyhow!(
                        "catalog refresh failed: {}",
                        store
                            .last_error()
                            .unwrap_or_else(|| "unknown error".to_string())
                    ));
                }
            }
        }
        Commands::Update { dry_run } => {
            context.layout.ensure_root()?;
            let remote = HttpRemoteSource::new(&context.config.catalog_url)?;
            let snapshot = refreshed_store(&remote)?;
            let policy = FileBackedPolicy::new(context.config_path.clone());
            let host = DiskStateHost {
                layout: &context.layout,
            };
            let extractor = CommandExtractor;

            let pass = UpdatePass {
                layout: &context.layout,
                snapshot: &snapshot,
                remote: &remote,
                host: &host,
                policy: &policy,
                extractor: &extractor,
                host_api_level: context.config.api_level,
            };
            let (all_succeeded, outcomes) = pass.run(dry_run);

            for line in render_outcome_lines(context.style, &outcomes, dry_run) {
                println!("{line}");
            }
            if !all_succeeded {
                return Err(anyhow!("update pass completed with errors"));
            }
        }
        Commands::Install { name, testing } => {
            context.layout.ensure_root()?;
            let remote = HttpRemoteSource::new(&context.config.catalog_url)?;
            let snapshot = refreshed_store(&remote)?;
            let definition = snapshot
                .plugins
                .iter()
                .find(|definition| definition.internal_name == name)
                .ok_or_else(|| anyhow!("plugin '{name}' is not in the catalog"))?;

            let channel = if testing || definition.testing_only {
                ReleaseChannel::Testing
            } else {
                ReleaseChannel::Stable
            };
            if channel.is_testing() && !testing {
                let policy = FileBackedPolicy::new(context.config_path.clone());
                if !policy.testing_channel_enabled() {
                    return Err(anyhow!(
                        "plugin '{name}' only publishes testing builds; enable the testing channel or pass --testing"
                    ));
                }
            }

            let host = DetachedHost;
            let extractor = CommandExtractor;
            let report =
                install_from_catalog(&context.layout, &remote, &host, &extractor, definition, channel)?;

            if !report.installed {
                return Err(anyhow!("install failed for plugin '{name}'"));
            }
            println!(
                "{}",
                render_status_line(
                    context.style,
                    true,
                    &format!("installed {} ({})", definition.display_name, name),
                )
            );
        }
        Commands::Cleanup => {
            let report = cleanup(&context.layout)?;
            if report.removed.is_empty() {
                println!("Nothing to clean up.");
            } else {
                for path in &report.removed {
                    println!("removed {}", path.display());
                }
            }
        }
        Commands::List => {
            for line in list_lines(&context.layout)? {
                println!("{line}");
            }
        }
        Commands::Doctor => {
            println!("store root: {}", context.layout.root().display());
            println!("config: {}", context.config_path.display());
            println!("catalog url: {}", context.config.catalog_url);
            println!("host api level: {}", context.config.api_level);
            println!("testing channel: {}", context.config.testing_channel);
        }
    }

    Ok(())
}

pub(crate) fn install_from_catalog(
    layout: &StoreLayout,
    remote: &dyn RemoteSource,
    host: &dyn PluginHost,
    extractor: &dyn ArchiveExtractor,
    definition: &PluginDefinition,
    channel: ReleaseChannel,
) -> Result<InstallReport> {
    let name = definition.internal_name.as_str();
    let versions = plugin_versions(layout, name)
        .with_context(|| format!("failed scanning installed versions of '{name}'"))?;
    let enable_after_install = !plugin_fully_disabled(&versions);

    // previous versions go dark before the new one lands; the installer
    // re-enables exactly one directory when enablement carries over
    disable_all_versions(layout, name)
        .with_context(|| format!("failed disabling previous versions of '{name}'"))?;

    Ok(Installer::new(layout, remote, host)
        .with_extractor(extractor)
        .install(definition, channel, enable_after_install))
}

fn list_lines(layout: &StoreLayout) -> Result<Vec<String>> {
    let plugins = installed_plugins(layout)?;
    if plugins.is_empty() {
        return Ok(vec!["No plugins installed.".to_string()]);
    }

    let mut lines = Vec::with_capacity(plugins.len());
    for plugin in plugins {
        let versions = plugin_versions(layout, &plugin)?;
        let Some(newest) = versions.last() else {
            lines.push(format!("{plugin} (no versions)"));
            continue;
        };

        let status = if plugin_fully_disabled(&versions) {
            "disabled"
        } else {
            "enabled"
        };
        let testing_tag = if newest.markers.testing {
            " [testing]"
        } else {
            ""
        };
        lines.push(format!(
            "{plugin} {} {status}{testing_tag}",
            newest.dir_name
        ));
    }
    Ok(lines)
}
