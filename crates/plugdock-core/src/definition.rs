use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginDefinition {
    pub internal_name: String,
    pub display_name: String,
    pub stable_version: String,
    pub testing_version: Option<String>,
    pub testing_only: bool,
    pub min_api_level: u32,
}

impl Default for PluginDefinition {
    fn default() -> Self {
        Self {
            internal_name: String::new(),
            display_name: String::new(),
            stable_version: String::new(),
            testing_version: None,
            testing_only: false,
            // a record that never declared its api requirement is incompatible,
            // not accidentally compatible with everything
            min_api_level: u32::MAX,
        }
    }
}

impl PluginDefinition {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let definition: Self =
            serde_json::from_str(input).context("failed to parse plugin definition")?;
        validate_internal_name(&definition.internal_name)?;
        Ok(definition)
    }

    pub fn channel_version(&self, testing: bool) -> Option<&str> {
        if testing {
            self.testing_version.as_deref()
        } else if self.stable_version.is_empty() {
            None
        } else {
            Some(&self.stable_version)
        }
    }
}

pub fn catalog_from_json_str(input: &str) -> Result<Vec<PluginDefinition>> {
    let mut definitions: Vec<PluginDefinition> =
        serde_json::from_str(input).context("failed to parse plugin catalog")?;
    for definition in &definitions {
        validate_internal_name(&definition.internal_name).with_context(|| {
            format!(
                "catalog entry '{}' has an invalid internal name",
                definition.display_name
            )
        })?;
    }
    definitions.sort_by(|left, right| left.display_name.cmp(&right.display_name));
    Ok(definitions)
}

pub fn validate_internal_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 {
        anyhow::bail!("invalid internal name: must be 1-64 characters");
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        anyhow::bail!("invalid internal name: '{name}'");
    };

    let first_is_valid = first.is_ascii_lowercase() || first.is_ascii_digit();
    let rest_is_valid =
        chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_');
    if !first_is_valid || !rest_is_valid {
        anyhow::bail!("invalid internal name: '{name}'");
    }

    Ok(())
}
