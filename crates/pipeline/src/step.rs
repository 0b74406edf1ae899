use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::BoxFuture;

/// Operation body of a step.
#[async_trait]
pub trait StepTask<C: Send>: Send + Sync {
    async fn run(&self, ctx: &mut C) -> Result<()>;
}

struct FnTask<F>(F);

#[async_trait]
impl<C, F> StepTask<C> for FnTask<F>
where
    C: Send,
    F: for<'a> Fn(&'a mut C) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    async fn run(&self, ctx: &mut C) -> Result<()> {
        (self.0)(ctx).await
    }
}

/// One unit of a command pipeline, immutable once constructed.
///
/// `enabled` answers whether this run needs the step at all, given the
/// context as it stands before the run; `skip` is a runtime condition
/// evaluated against the live context just before the task executes.
pub struct Step<C> {
    title: String,
    enabled: Option<Predicate<C>>,
    skip: Option<Predicate<C>>,
    task: Box<dyn StepTask<C>>,
}

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

impl<C: Send + 'static> Step<C> {
    pub fn new(title: impl Into<String>, task: impl StepTask<C> + 'static) -> Self {
        Self {
            title: title.into(),
            enabled: None,
            skip: None,
            task: Box::new(task),
        }
    }

    pub fn from_fn<F>(title: impl Into<String>, task: F) -> Self
    where
        F: for<'a> Fn(&'a mut C) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        Self::new(title, FnTask(task))
    }

    pub fn enabled(mut self, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        self.enabled = Some(Box::new(predicate));
        self
    }

    pub fn skip(mut self, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        self.skip = Some(Box::new(predicate));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn is_enabled(&self, ctx: &C) -> bool {
        self.enabled.as_ref().map_or(true, |predicate| predicate(ctx))
    }

    pub(crate) fn should_skip(&self, ctx: &C) -> bool {
        self.skip.as_ref().is_some_and(|predicate| predicate(ctx))
    }

    pub(crate) async fn execute(&self, ctx: &mut C) -> Result<()> {
        self.task.run(ctx).await
    }
}
