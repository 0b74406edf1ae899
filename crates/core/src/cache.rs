//! Persisted scan cache.
//!
//! The cache is an opportunistic optimization: a missing or unreadable
//! cache file degrades to a full rescan and is never an error.

use crate::constants::PLUGINS_CACHE_PATH;
use crate::fs::FileSystem;
use crate::plugin::PluginRegistry;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Last known scan state: the full registry plus, per resolved scan
/// pattern, the ordered plugin names found there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanCacheEntry {
    pub plugins: PluginRegistry,
    pub paths: BTreeMap<String, Vec<String>>,
}

pub struct ScanCache {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl ScanCache {
    pub fn new(fs: Arc<dyn FileSystem>, project_path: &Path) -> Self {
        Self {
            path: project_path.join(PLUGINS_CACHE_PATH),
            fs,
        }
    }

    /// Read failures of any kind are a cache miss.
    pub fn load(&self) -> Option<ScanCacheEntry> {
        let content = self.fs.read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(
                    path = %self.path.display(),
                    error = %err,
                    "Ignoring unreadable plugins cache"
                );
                None
            }
        }
    }

    /// Atomic overwrite: serialize to a temp sibling, then rename over
    /// the target. The cache is never left partially written.
    pub fn store(&self, entry: &ScanCacheEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entry)?;
        let staging = self.path.with_extension("json.tmp");
        self.fs.write_string(&staging, &content)?;
        self.fs.rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), "Stored plugins cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::plugin::Plugin;

    fn sample_entry() -> ScanCacheEntry {
        let mut plugins = PluginRegistry::new();
        plugins.insert(Plugin {
            name: "@rispa/core".to_string(),
            alias: None,
            path: PathBuf::from("/cwd/packages/rispa-core"),
            scripts: vec![],
            activator: None,
            generators: None,
        });

        let mut paths = BTreeMap::new();
        paths.insert(
            "/cwd/packages/*".to_string(),
            vec!["@rispa/core".to_string()],
        );

        ScanCacheEntry { plugins, paths }
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let cache = ScanCache::new(Arc::clone(&fs), Path::new("/cwd"));
        let entry = sample_entry();

        cache.store(&entry).unwrap();
        assert_eq!(cache.load(), Some(entry));
    }

    #[test]
    fn test_missing_cache_is_a_miss() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let cache = ScanCache::new(fs, Path::new("/cwd"));

        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_corrupt_cache_is_a_miss() {
        let mock = Arc::new(MockFileSystem::new());
        mock.add_file("/cwd/build/plugins.json", "not json {");
        let cache = ScanCache::new(mock, Path::new("/cwd"));

        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_store_leaves_no_staging_file() {
        let mock = Arc::new(MockFileSystem::new());
        let cache = ScanCache::new(Arc::clone(&mock) as Arc<dyn FileSystem>, Path::new("/cwd"));

        cache.store(&sample_entry()).unwrap();
        assert!(!mock.exists(Path::new("/cwd/build/plugins.json.tmp")));
        assert!(mock.is_file(Path::new("/cwd/build/plugins.json")));
    }
}
