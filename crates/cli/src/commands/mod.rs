pub mod bootstrap;
pub mod generate;
pub mod tag_version;

pub use bootstrap::{BootstrapCommand, BootstrapContext};
pub use generate::{GenerateCommand, GenerateContext};
pub use tag_version::{TagVersionCommand, TagVersionContext};
