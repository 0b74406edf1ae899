pub mod commands;

pub use commands::{BootstrapArgs, CliArgs, Commands, GenerateArgs, TagVersionArgs};
