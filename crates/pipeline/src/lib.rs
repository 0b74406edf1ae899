//! Ordered-step pipeline shared by every command.
//!
//! A command declares its steps once; the pipeline excludes the ones
//! whose `enabled` predicate says the run does not need them, then
//! executes the rest strictly in declaration order against one mutable
//! context, short-circuiting on the first failure.

mod command;
mod runner;
mod step;

pub use command::Command;
pub use runner::{Pipeline, RunReport, StepOutcome};
pub use step::{Step, StepTask};
