use thiserror::Error;

/// Domain errors surfaced to the user with fixed, matchable messages.
///
/// A scanned directory that is not a plugin is deliberately absent here:
/// that outcome is benign and never reported as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Incorrect configuration file `lerna.json`")]
    InvalidWorkspaceManifest,

    #[error("Can't find plugin with name {0}")]
    PluginNotFound(String),

    #[error("Can't find generator with name {0}")]
    GeneratorNotFound(String),

    #[error("Can't find generators")]
    NoGenerators,

    /// A pipeline step read a context field no earlier step populated.
    #[error("Context field `{0}` is not populated yet")]
    ContextField(&'static str),
}
