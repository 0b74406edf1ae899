//! Workspace, plugin, and project configuration manifests.

use crate::constants::{
    CONFIGURATION_PATH, DEFAULT_PLUGINS_PATH, LERNA_JSON_PATH, PACKAGE_JSON_PATH,
    PLUGIN_ALIAS_FIELD, PLUGIN_PREFIX, PLUGIN_SCRIPTS, SCOPED_PLUGIN_PREFIX,
};
use crate::error::RegistryError;
use crate::fs::FileSystem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// The project's package-pattern declaration (`lerna.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceManifest {
    pub packages: Vec<String>,
}

impl WorkspaceManifest {
    /// A missing or unreadable file and a `packages` field that is not a
    /// non-empty list of strings are all the same fatal configuration
    /// error.
    pub fn load(fs: &dyn FileSystem, project_path: &Path) -> Result<Self, RegistryError> {
        let path = project_path.join(LERNA_JSON_PATH);
        let content = fs
            .read_to_string(&path)
            .map_err(|_| RegistryError::InvalidWorkspaceManifest)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|_| RegistryError::InvalidWorkspaceManifest)?;

        let packages: Vec<String> = value["packages"]
            .as_array()
            .map(|patterns| {
                patterns
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        if packages.is_empty() {
            return Err(RegistryError::InvalidWorkspaceManifest);
        }

        Ok(Self { packages })
    }
}

/// The recognized parts of a candidate directory's `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: String,
    pub alias: Option<String>,
    pub scripts: Vec<String>,
}

impl PluginManifest {
    /// `None` is the benign outcome for directories that are not
    /// plugins: no manifest, unparseable JSON, or a name without the
    /// plugin prefix.
    pub fn load(fs: &dyn FileSystem, dir: &Path) -> Option<Self> {
        let content = fs.read_to_string(&dir.join(PACKAGE_JSON_PATH)).ok()?;
        let value: Value = serde_json::from_str(&content).ok()?;

        let name = canonical_plugin_name(value["name"].as_str()?)?;
        let alias = value[PLUGIN_ALIAS_FIELD].as_str().map(String::from);
        let scripts = match value.get("scripts").and_then(Value::as_object) {
            Some(declared) => PLUGIN_SCRIPTS
                .iter()
                .filter(|script| declared.contains_key(**script))
                .map(|script| script.to_string())
                .collect(),
            None => Vec::new(),
        };

        Some(Self {
            name,
            alias,
            scripts,
        })
    }
}

/// Strip either accepted prefix and re-prefix to the scoped form, e.g.
/// `rispa-core` and `@rispa/core` both normalize to `@rispa/core`.
/// `None` means the name does not identify a plugin.
pub fn canonical_plugin_name(raw: &str) -> Option<String> {
    raw.strip_prefix(SCOPED_PLUGIN_PREFIX)
        .or_else(|| raw.strip_prefix(PLUGIN_PREFIX))
        .filter(|rest| !rest.is_empty())
        .map(|rest| format!("{SCOPED_PLUGIN_PREFIX}{rest}"))
}

/// Optional project-level settings (`.rispa.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfiguration {
    pub plugins_path: String,
}

impl Default for ProjectConfiguration {
    fn default() -> Self {
        Self {
            plugins_path: DEFAULT_PLUGINS_PATH.to_string(),
        }
    }
}

impl ProjectConfiguration {
    /// A missing file degrades to defaults; a malformed one is fatal.
    pub fn load(fs: &dyn FileSystem, project_path: &Path) -> Result<Self> {
        let path = project_path.join(CONFIGURATION_PATH);
        if !fs.is_file(&path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Incorrect configuration file `{CONFIGURATION_PATH}`"))
    }
}
