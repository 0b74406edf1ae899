pub mod cache;
pub mod constants;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod plugin;
pub mod registry;
pub mod scanner;

pub use cache::{ScanCache, ScanCacheEntry};
pub use error::RegistryError;
pub use manifest::{ProjectConfiguration, WorkspaceManifest};
pub use plugin::{Plugin, PluginRegistry};
pub use registry::scan_plugins;
pub use scanner::Scanner;
