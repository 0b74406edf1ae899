pub mod cli;
pub mod commands;
pub mod generator;
pub mod git;
pub mod installer;
pub mod prompt;
pub mod tasks;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
