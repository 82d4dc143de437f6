use std::path::Path;

use anyhow::Result;

use crate::definition::PluginDefinition;

pub trait PluginHost {
    fn load_plugin(&self, path: &Path, reason: &str) -> bool;

    fn disable_plugin(&self, definition: &PluginDefinition) -> Result<()>;

    fn live_plugins(&self) -> Vec<String>;

    fn is_plugin_live(&self, internal_name: &str) -> bool {
        self.live_plugins()
            .iter()
            .any(|name| name == internal_name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl PluginHost for DetachedHost {
    fn load_plugin(&self, _path: &Path, _reason: &str) -> bool {
        true
    }

    fn disable_plugin(&self, _definition: &PluginDefinition) -> Result<()> {
        Ok(())
    }

    fn live_plugins(&self) -> Vec<String> {
        Vec::new()
    }
}
