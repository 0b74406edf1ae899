//! Integration tests for plugin discovery and the scan cache.

use rispa_core::fs::{FileSystem, MockFileSystem, RealFileSystem};
use rispa_core::{scan_plugins, PluginRegistry};
use std::path::Path;
use std::sync::Arc;

const CWD: &str = "/cwd";

fn add_lerna_json(fs: &MockFileSystem) {
    fs.add_file("/cwd/lerna.json", r#"{ "packages": ["packages/*"] }"#);
}

fn add_core_plugin(fs: &MockFileSystem) {
    fs.add_file(
        "/cwd/packages/rispa-core/package.json",
        r#"{ "name": "@rispa/core" }"#,
    );
}

fn add_webpack_plugin(fs: &MockFileSystem) {
    fs.add_file(
        "/cwd/packages/rispa-webpack/package.json",
        r#"{
            "name": "@rispa/webpack",
            "rispa:name": "webpack",
            "scripts": { "build": "webpack" }
        }"#,
    );
    fs.add_file("/cwd/packages/rispa-webpack/lib/activator.js", "");
    fs.add_dir("/cwd/packages/rispa-webpack/lib/generators");
}

fn project_fs() -> Arc<MockFileSystem> {
    let fs = MockFileSystem::new();
    add_lerna_json(&fs);
    add_core_plugin(&fs);
    add_webpack_plugin(&fs);
    Arc::new(fs)
}

fn scan(fs: &Arc<MockFileSystem>) -> anyhow::Result<PluginRegistry> {
    let fs: Arc<dyn FileSystem> = Arc::clone(fs) as Arc<dyn FileSystem>;
    scan_plugins(&fs, Path::new(CWD))
}

#[test]
fn test_scan_builds_registry() {
    let fs = project_fs();
    let registry = scan(&fs).unwrap();

    assert_eq!(registry.len(), 2);

    let core = registry.get("@rispa/core").unwrap();
    assert_eq!(core.path, Path::new("/cwd/packages/rispa-core"));
    assert_eq!(core.alias, None);
    assert!(core.scripts.is_empty());
    assert_eq!(core.activator, None);
    assert_eq!(core.generators, None);

    let webpack = registry.get("@rispa/webpack").unwrap();
    assert_eq!(webpack.alias.as_deref(), Some("webpack"));
    assert_eq!(webpack.scripts, vec!["build"]);
    assert_eq!(
        webpack.activator.as_deref(),
        Some(Path::new("/cwd/packages/rispa-webpack/lib/activator.js"))
    );
    assert_eq!(
        webpack.generators.as_deref(),
        Some(Path::new("/cwd/packages/rispa-webpack/lib/generators"))
    );
}

#[test]
fn test_alias_and_name_address_same_plugin() {
    let fs = project_fs();
    let registry = scan(&fs).unwrap();

    let by_name = registry.get("@rispa/webpack").unwrap();
    let by_alias = registry.get("webpack").unwrap();
    assert_eq!(by_name.path, by_alias.path);
}

#[test]
fn test_non_plugin_directory_is_excluded() {
    let fs = project_fs();
    fs.add_file(
        "/cwd/packages/invalid-plugin/package.json",
        r#"{ "name": "invalid-plugin" }"#,
    );

    let registry = scan(&fs).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(!registry.contains("invalid-plugin"));
}

#[test]
fn test_null_packages_is_fatal() {
    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("/cwd/lerna.json", r#"{ "packages": null }"#);
    add_core_plugin(&fs);

    let err = scan(&fs).unwrap_err();
    assert_eq!(err.to_string(), "Incorrect configuration file `lerna.json`");
}

#[test]
fn test_scan_writes_cache() {
    let fs = project_fs();
    scan(&fs).unwrap();

    let cache = fs
        .read_to_string(Path::new("/cwd/build/plugins.json"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&cache).unwrap();
    assert_eq!(
        value["paths"]["/cwd/packages/*"],
        serde_json::json!(["@rispa/core", "@rispa/webpack"])
    );
    assert!(value["plugins"]["webpack"].is_object());
}

#[test]
fn test_scan_reuses_cache_without_reading_manifests() {
    let fs = project_fs();
    let first = scan(&fs).unwrap();

    // A manifest edit that leaves the cached name list intact is not
    // observed until the cache is invalidated.
    fs.add_file(
        "/cwd/packages/rispa-core/package.json",
        r#"{ "name": "@rispa/core", "rispa:name": "core" }"#,
    );

    let second = scan(&fs).unwrap();
    assert_eq!(second, first);
    assert!(!second.contains("core"));

    // Dropping the cache picks the change up.
    fs.remove("/cwd/build/plugins.json");
    let third = scan(&fs).unwrap();
    assert_eq!(third.get("core").unwrap().name, "@rispa/core");
}

#[test]
fn test_scan_from_cache_alone() {
    let fs = Arc::new(MockFileSystem::new());
    add_lerna_json(&fs);
    fs.add_file(
        "/cwd/build/plugins.json",
        r#"{
            "plugins": {
                "@rispa/core": {
                    "name": "@rispa/core",
                    "path": "/cwd/packages/rispa-core",
                    "scripts": []
                }
            },
            "paths": { "/cwd/packages/*": ["@rispa/core"] }
        }"#,
    );

    let registry = scan(&fs).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.get("@rispa/core").unwrap().path,
        Path::new("/cwd/packages/rispa-core")
    );
}

#[test]
fn test_cache_with_dangling_name_forces_revalidation() {
    let fs = project_fs();
    fs.add_file(
        "/cwd/build/plugins.json",
        r#"{
            "plugins": {},
            "paths": { "/cwd/packages/*": ["@rispa/gone"] }
        }"#,
    );

    let registry = scan(&fs).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("@rispa/core"));
}

#[test]
fn test_rescan_is_idempotent() {
    let fs = project_fs();
    let first = scan(&fs).unwrap();
    let cache_after_first = fs
        .read_to_string(Path::new("/cwd/build/plugins.json"))
        .unwrap();

    let second = scan(&fs).unwrap();
    let cache_after_second = fs
        .read_to_string(Path::new("/cwd/build/plugins.json"))
        .unwrap();

    assert_eq!(second, first);
    assert_eq!(cache_after_second, cache_after_first);
}

#[test]
fn test_scan_on_real_filesystem() {
    let dir = tempfile::TempDir::new().unwrap();
    let base = dir.path();

    std::fs::write(base.join("lerna.json"), r#"{ "packages": ["packages/*"] }"#).unwrap();
    std::fs::create_dir_all(base.join("packages/rispa-core")).unwrap();
    std::fs::write(
        base.join("packages/rispa-core/package.json"),
        r#"{ "name": "rispa-core" }"#,
    )
    .unwrap();
    std::fs::create_dir_all(base.join("packages/not-a-plugin")).unwrap();
    std::fs::write(
        base.join("packages/not-a-plugin/package.json"),
        r#"{ "name": "left-pad" }"#,
    )
    .unwrap();

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
    let registry = scan_plugins(&fs, base).unwrap();

    assert_eq!(registry.len(), 1);
    let core = registry.get("@rispa/core").unwrap();
    assert_eq!(core.path, base.join("packages/rispa-core"));
    assert!(base.join("build/plugins.json").is_file());
}
