use crate::runner::{Pipeline, RunReport};
use crate::step::Step;
use anyhow::Result;
use async_trait::async_trait;

/// A command declares its ordered steps; the shared base behavior runs
/// them. The context is private to one run and is the only artifact a
/// successful run leaves behind.
#[async_trait]
pub trait Command: Send + Sync {
    type Context: Send + 'static;

    /// Build the ordered step list from the command's own state.
    fn init(&self) -> Vec<Step<Self::Context>>;

    async fn run(&self, ctx: &mut Self::Context) -> Result<RunReport> {
        Pipeline::new(self.init()).run(ctx).await
    }
}
