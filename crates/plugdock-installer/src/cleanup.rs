use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::layout::StoreLayout;
use crate::scan::{installed_plugins, plugin_versions};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
}

pub fn cleanup(layout: &StoreLayout) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for plugin in installed_plugins(layout)? {
        let versions = match plugin_versions(layout, &plugin) {
            Ok(versions) => versions,
            Err(err) => {
                warn!(plugin = %plugin, "cleanup skipped plugin: {err:#}");
                continue;
            }
        };
        let Some((_newest, superseded)) = versions.split_last() else {
            continue;
        };

        for installed in superseded {
            if !installed.markers.disabled {
                debug!(
                    plugin = %plugin,
                    dir = %installed.dir_name,
                    "cleanup kept unmarked superseded version"
                );
                continue;
            }
            if let Err(err) = fs::remove_dir_all(&installed.path) {
                warn!(
                    plugin = %plugin,
                    dir = %installed.dir_name,
                    "cleanup failed to remove version dir: {err}"
                );
                continue;
            }
            report.removed.push(installed.path.clone());
        }
    }

    Ok(report)
}
