use super::HasTaskContext;
use futures_util::FutureExt;
use rispa_pipeline::Step;

/// Populates `plugins` with the validated registry for the project.
pub fn scan_plugins_step<C>() -> Step<C>
where
    C: HasTaskContext + Send + 'static,
{
    Step::from_fn("Scan plugins", |ctx: &mut C| {
        async move {
            let task = ctx.task_mut();
            let registry = rispa_core::scan_plugins(&task.fs, &task.project_path)?;
            task.plugins = Some(registry);
            Ok(())
        }
        .boxed()
    })
}
