//! Plugin records and the dual-keyed registry.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// One discovered plugin package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Canonical identifier, always carrying the scoped prefix.
    pub name: String,
    /// Optional short identifier declared by the plugin manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Absolute plugin directory.
    pub path: PathBuf,
    /// Recognized lifecycle script names declared in the manifest.
    #[serde(default)]
    pub scripts: Vec<String>,
    /// Activation entry file, when present on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activator: Option<PathBuf>,
    /// Generator definitions directory, when present on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generators: Option<PathBuf>,
}

/// Mapping from key (name or alias) to plugin.
///
/// Records live in an arena; the key index maps both the canonical name
/// and, when declared, the alias onto the same arena slot, so a lookup
/// or mutation through either key addresses one shared record.
#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    records: Vec<Plugin>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plugin under its canonical name and, when declared, its
    /// alias. Re-inserting a canonical name replaces the record in place.
    pub fn insert(&mut self, plugin: Plugin) {
        if let Some(&slot) = self.index.get(&plugin.name) {
            let alias = plugin.alias.clone();
            self.records[slot] = plugin;
            if let Some(alias) = alias {
                self.index.insert(alias, slot);
            }
            return;
        }

        let slot = self.records.len();
        self.index.insert(plugin.name.clone(), slot);
        if let Some(alias) = &plugin.alias {
            self.index.insert(alias.clone(), slot);
        }
        self.records.push(plugin);
    }

    pub fn get(&self, key: &str) -> Option<&Plugin> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Plugin> {
        let slot = *self.index.get(key)?;
        Some(&mut self.records[slot])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Unique plugin records in first-insertion order. Aliased plugins
    /// appear once.
    pub fn unique(&self) -> impl Iterator<Item = &Plugin> {
        self.records.iter()
    }

    /// Number of unique plugins, not keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    fn as_map(&self) -> BTreeMap<&str, &Plugin> {
        self.index
            .iter()
            .map(|(key, &slot)| (key.as_str(), &self.records[slot]))
            .collect()
    }
}

impl PartialEq for PluginRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.as_map() == other.as_map()
    }
}

// The wire shape is a flat key -> record map, so an aliased plugin is
// written under both keys and re-merged into one record on read.
impl Serialize for PluginRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PluginRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, Plugin>::deserialize(deserializer)?;
        let mut registry = PluginRegistry::new();
        for (_, plugin) in map {
            registry.insert(plugin);
        }
        Ok(registry)
    }
}
