//! Shared pipeline tasks and the context they populate.
//!
//! Field availability is a per-step contract: a task must not read a
//! field no earlier step populated. The checked accessors turn a
//! violation into an explicit error instead of a silent default.

mod read_configuration;
mod scan_plugins;

pub use read_configuration::read_configuration_step;
pub use scan_plugins::scan_plugins_step;

use rispa_core::fs::FileSystem;
use rispa_core::{PluginRegistry, ProjectConfiguration, RegistryError};
use std::path::PathBuf;
use std::sync::Arc;

/// The record threaded through every step of one command invocation.
pub struct TaskContext {
    pub fs: Arc<dyn FileSystem>,
    pub project_path: PathBuf,
    /// Populated by "Read project configuration".
    pub configuration: Option<ProjectConfiguration>,
    /// Populated by "Scan plugins".
    pub plugins: Option<PluginRegistry>,
}

impl TaskContext {
    pub fn new(fs: Arc<dyn FileSystem>, project_path: PathBuf) -> Self {
        Self {
            fs,
            project_path,
            configuration: None,
            plugins: None,
        }
    }

    pub fn configuration(&self) -> Result<&ProjectConfiguration, RegistryError> {
        self.configuration
            .as_ref()
            .ok_or(RegistryError::ContextField("configuration"))
    }

    pub fn plugins(&self) -> Result<&PluginRegistry, RegistryError> {
        self.plugins
            .as_ref()
            .ok_or(RegistryError::ContextField("plugins"))
    }
}

/// Lets command-specific contexts reuse the shared steps.
pub trait HasTaskContext {
    fn task(&self) -> &TaskContext;
    fn task_mut(&mut self) -> &mut TaskContext;
}

impl HasTaskContext for TaskContext {
    fn task(&self) -> &TaskContext {
        self
    }

    fn task_mut(&mut self) -> &mut TaskContext {
        self
    }
}
