//! `ris bootstrap` — install project dependencies after a scan.

use crate::installer::Installer;
use crate::tasks::{read_configuration_step, scan_plugins_step, HasTaskContext, TaskContext};
use futures_util::FutureExt;
use rispa_core::fs::FileSystem;
use rispa_pipeline::{Command, Step};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct BootstrapContext {
    pub task: TaskContext,
}

impl BootstrapContext {
    pub fn new(fs: Arc<dyn FileSystem>, project_path: PathBuf) -> Self {
        Self {
            task: TaskContext::new(fs, project_path),
        }
    }
}

impl HasTaskContext for BootstrapContext {
    fn task(&self) -> &TaskContext {
        &self.task
    }

    fn task_mut(&mut self) -> &mut TaskContext {
        &mut self.task
    }
}

pub struct BootstrapCommand {
    installer: Arc<dyn Installer>,
}

impl BootstrapCommand {
    pub fn new(installer: Arc<dyn Installer>) -> Self {
        Self { installer }
    }
}

impl Command for BootstrapCommand {
    type Context = BootstrapContext;

    fn init(&self) -> Vec<Step<BootstrapContext>> {
        let installer = Arc::clone(&self.installer);

        vec![
            read_configuration_step(),
            scan_plugins_step(),
            Step::from_fn(
                "Bootstrap project dependencies",
                move |ctx: &mut BootstrapContext| {
                    let installer = Arc::clone(&installer);
                    async move {
                        let count = ctx.task.plugins()?.unique().count();
                        info!(plugins = count, "Bootstrapping project");
                        installer.install(&ctx.task.project_path)
                    }
                    .boxed()
                },
            ),
        ]
    }
}
