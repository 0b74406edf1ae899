//! Fixed names and paths of the plugin filesystem contract.

/// Unscoped prefix a plugin manifest name may carry.
pub const PLUGIN_PREFIX: &str = "rispa-";

/// Normalized scoped prefix every canonical plugin name carries.
pub const SCOPED_PLUGIN_PREFIX: &str = "@rispa/";

/// `package.json` field declaring the optional short alias.
pub const PLUGIN_ALIAS_FIELD: &str = "rispa:name";

/// Lifecycle script names retained from a plugin manifest.
pub const PLUGIN_SCRIPTS: &[&str] = &["build", "watch", "lint", "test"];

/// Activation entry file, relative to the plugin directory.
pub const PLUGIN_ACTIVATOR_PATH: &str = "lib/activator.js";

/// Generator definitions directory, relative to the plugin directory.
pub const PLUGIN_GENERATORS_PATH: &str = "lib/generators";

pub const LERNA_JSON_PATH: &str = "lerna.json";
pub const PACKAGE_JSON_PATH: &str = "package.json";
pub const PLUGINS_CACHE_PATH: &str = "build/plugins.json";
pub const CONFIGURATION_PATH: &str = ".rispa.json";

/// Default directory for plugin packages when `.rispa.json` is absent.
pub const DEFAULT_PLUGINS_PATH: &str = "packages";
