use crate::step::Step;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped,
}

/// Per-step accounting of a successful run. Disabled steps never
/// appear here.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(String, StepOutcome)>,
}

impl RunReport {
    pub fn outcome(&self, title: &str) -> Option<StepOutcome> {
        self.outcomes
            .iter()
            .find(|(step, _)| step == title)
            .map(|(_, outcome)| *outcome)
    }

    pub fn completed(&self) -> usize {
        self.count(StepOutcome::Completed)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepOutcome::Skipped)
    }

    fn count(&self, wanted: StepOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == wanted)
            .count()
    }
}

pub struct Pipeline<C> {
    steps: Vec<Step<C>>,
}

impl<C: Send + 'static> Pipeline<C> {
    pub fn new(steps: Vec<Step<C>>) -> Self {
        Self { steps }
    }

    /// Run the enabled steps strictly in declaration order against
    /// `ctx`, one at a time. The first task failure aborts the rest;
    /// context mutations of completed steps are kept.
    pub async fn run(self, ctx: &mut C) -> Result<RunReport> {
        let steps: Vec<Step<C>> = self
            .steps
            .into_iter()
            .filter(|step| step.is_enabled(ctx))
            .collect();

        let mut report = RunReport::default();
        for step in &steps {
            let title = step.title().to_string();

            if step.should_skip(ctx) {
                debug!(step = %title, "Step skipped");
                report.outcomes.push((title, StepOutcome::Skipped));
                continue;
            }

            info!(step = %title, "Starting step");
            let start = Instant::now();
            step.execute(ctx)
                .await
                .with_context(|| format!("Step '{title}' failed"))?;
            info!(
                step = %title,
                duration_ms = start.elapsed().as_millis() as u64,
                "Step complete"
            );
            report.outcomes.push((title, StepOutcome::Completed));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use futures_util::FutureExt;

    #[derive(Default)]
    struct TestContext {
        trace: Vec<&'static str>,
        feature: bool,
    }

    fn record(label: &'static str) -> Step<TestContext> {
        Step::from_fn(label, move |ctx: &mut TestContext| {
            async move {
                ctx.trace.push(label);
                Ok(())
            }
            .boxed()
        })
    }

    fn failing(label: &'static str) -> Step<TestContext> {
        Step::from_fn(label, move |_ctx: &mut TestContext| {
            async move { Err(anyhow!("boom")) }.boxed()
        })
    }

    #[tokio::test]
    async fn test_steps_run_in_declaration_order() {
        let mut ctx = TestContext::default();
        let report = Pipeline::new(vec![record("first"), record("second"), record("third")])
            .run(&mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.trace, vec!["first", "second", "third"]);
        assert_eq!(report.completed(), 3);
        assert_eq!(report.skipped(), 0);
    }

    #[tokio::test]
    async fn test_failure_short_circuits_and_names_step() {
        let mut ctx = TestContext::default();
        let err = Pipeline::new(vec![record("first"), failing("explode"), record("after")])
            .run(&mut ctx)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Step 'explode' failed"));
        assert_eq!(ctx.trace, vec!["first"]);
    }

    #[tokio::test]
    async fn test_disabled_step_is_excluded_entirely() {
        let mut ctx = TestContext::default();
        let report = Pipeline::new(vec![
            record("kept"),
            record("dropped").enabled(|_| false),
        ])
        .run(&mut ctx)
        .await
        .unwrap();

        assert_eq!(ctx.trace, vec!["kept"]);
        assert_eq!(report.outcome("dropped"), None);
        assert_eq!(report.outcomes.len(), 1);
    }

    #[tokio::test]
    async fn test_skipped_step_is_recorded_but_never_runs() {
        let mut ctx = TestContext::default();
        let report = Pipeline::new(vec![
            record("kept"),
            record("skipped").skip(|_| true),
        ])
        .run(&mut ctx)
        .await
        .unwrap();

        assert_eq!(ctx.trace, vec!["kept"]);
        assert_eq!(report.outcome("skipped"), Some(StepOutcome::Skipped));
        assert_eq!(report.skipped(), 1);
    }

    #[tokio::test]
    async fn test_skip_sees_mutations_of_earlier_steps() {
        let mut ctx = TestContext::default();
        let mark_feature = Step::from_fn("mark", |ctx: &mut TestContext| {
            async move {
                ctx.feature = true;
                Ok(())
            }
            .boxed()
        });

        let report = Pipeline::new(vec![
            mark_feature,
            record("gated").skip(|ctx| ctx.feature),
        ])
        .run(&mut ctx)
        .await
        .unwrap();

        assert_eq!(report.outcome("gated"), Some(StepOutcome::Skipped));
        assert!(ctx.trace.is_empty());
    }

    #[tokio::test]
    async fn test_enabled_is_evaluated_before_the_run() {
        // `enabled` looks at the context as it stands before any step
        // runs, so a mutation mid-run cannot re-include a step.
        let mut ctx = TestContext::default();
        let mark_feature = Step::from_fn("mark", |ctx: &mut TestContext| {
            async move {
                ctx.feature = true;
                Ok(())
            }
            .boxed()
        });

        let report = Pipeline::new(vec![
            mark_feature,
            record("needs-feature").enabled(|ctx| ctx.feature),
        ])
        .run(&mut ctx)
        .await
        .unwrap();

        assert_eq!(report.outcome("needs-feature"), None);
        assert!(ctx.trace.is_empty());
    }
}
