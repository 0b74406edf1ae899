//! Plugin discovery across the workspace package patterns.

use crate::cache::{ScanCache, ScanCacheEntry};
use crate::constants::{PLUGIN_ACTIVATOR_PATH, PLUGIN_GENERATORS_PATH};
use crate::fs::FileSystem;
use crate::manifest::{PluginManifest, WorkspaceManifest};
use crate::plugin::{Plugin, PluginRegistry};
use crate::scanner::Scanner;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the complete, validated plugin registry for the project.
///
/// Reads the workspace manifest's package patterns, resolves each to
/// candidate directories, reuses cached records where the cache still
/// covers a pattern, validates the rest against their manifests, and
/// rewrites the cache with the state actually used this run.
pub fn scan_plugins(fs: &Arc<dyn FileSystem>, project_path: &Path) -> Result<PluginRegistry> {
    let manifest = WorkspaceManifest::load(fs.as_ref(), project_path)?;
    let scanner = Scanner::new(Arc::clone(fs));
    let cache = ScanCache::new(Arc::clone(fs), project_path);
    let cached = cache.load();

    let mut registry = PluginRegistry::new();
    let mut paths = BTreeMap::new();

    for pattern in &manifest.packages {
        let resolved = project_path.join(pattern).to_string_lossy().into_owned();
        let candidates = scanner.scan(project_path, pattern)?;

        let mut names = Vec::new();
        if let Some(reusable) = cached_plugins(cached.as_ref(), &resolved) {
            debug!(
                pattern = %resolved,
                count = reusable.len(),
                "Reusing cached plugins"
            );
            for plugin in reusable {
                names.push(plugin.name.clone());
                registry.insert(plugin);
            }
        } else {
            for dir in candidates {
                let Some(manifest) = PluginManifest::load(fs.as_ref(), &dir) else {
                    debug!(dir = %dir.display(), "Skipping non-plugin directory");
                    continue;
                };
                let plugin = validate_plugin(fs.as_ref(), manifest, dir);
                names.push(plugin.name.clone());
                registry.insert(plugin);
            }
        }

        paths.insert(resolved, names);
    }

    let entry = ScanCacheEntry {
        plugins: registry.clone(),
        paths,
    };
    if let Err(err) = cache.store(&entry) {
        warn!(error = %err, "Failed to write plugins cache");
    }

    info!(count = registry.len(), "Plugin scan complete");
    Ok(registry)
}

/// A pattern is served from cache only when its recorded name list is
/// non-empty and every name still resolves in the cached registry.
fn cached_plugins(cached: Option<&ScanCacheEntry>, resolved: &str) -> Option<Vec<Plugin>> {
    let entry = cached?;
    let names = entry.paths.get(resolved)?;
    if names.is_empty() {
        return None;
    }
    names
        .iter()
        .map(|name| entry.plugins.get(name).cloned())
        .collect()
}

fn validate_plugin(fs: &dyn FileSystem, manifest: PluginManifest, dir: PathBuf) -> Plugin {
    let activator = dir.join(PLUGIN_ACTIVATOR_PATH);
    let generators = dir.join(PLUGIN_GENERATORS_PATH);

    Plugin {
        name: manifest.name,
        alias: manifest.alias,
        scripts: manifest.scripts,
        activator: fs.is_file(&activator).then_some(activator),
        generators: fs.is_dir(&generators).then_some(generators),
        path: dir,
    }
}
