use super::HasTaskContext;
use futures_util::FutureExt;
use rispa_core::ProjectConfiguration;
use rispa_pipeline::Step;

/// Populates `configuration` from the optional project settings file.
pub fn read_configuration_step<C>() -> Step<C>
where
    C: HasTaskContext + Send + 'static,
{
    Step::from_fn("Read project configuration", |ctx: &mut C| {
        async move {
            let task = ctx.task_mut();
            let configuration = ProjectConfiguration::load(task.fs.as_ref(), &task.project_path)?;
            task.configuration = Some(configuration);
            Ok(())
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskContext;
    use rispa_core::fs::{FileSystem, MockFileSystem};
    use rispa_pipeline::Pipeline;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_populates_defaults_without_file() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let mut ctx = TaskContext::new(fs, PathBuf::from("/cwd"));

        Pipeline::new(vec![read_configuration_step()])
            .run(&mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.configuration().unwrap().plugins_path, "packages");
    }
}
