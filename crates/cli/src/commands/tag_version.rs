//! `ris tag-version` — bump the last version tag interactively.

use crate::git::{self, TagInfo};
use crate::prompt::Prompt;
use anyhow::anyhow;
use futures_util::FutureExt;
use rispa_pipeline::{Command, Step};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const CANCEL_CHOICE: &str = "Cancel select";

pub struct TagVersionContext {
    pub project_path: PathBuf,
    pub tag: Option<TagInfo>,
    pub next_version: Option<String>,
}

impl TagVersionContext {
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            project_path,
            tag: None,
            next_version: None,
        }
    }
}

pub struct TagVersionCommand {
    prompt: Arc<dyn Prompt>,
}

impl TagVersionCommand {
    pub fn new(prompt: Arc<dyn Prompt>) -> Self {
        Self { prompt }
    }
}

/// The bump choices offered for the current tag, cancel first.
fn bump_choices(tag: &TagInfo) -> Vec<String> {
    vec![
        CANCEL_CHOICE.to_string(),
        format!("PATCH {}.{}.{}", tag.major, tag.minor, tag.patch + 1),
        format!("MINOR {}.{}.0", tag.major, tag.minor + 1),
        format!("MAJOR {}.0.0", tag.major + 1),
    ]
}

impl Command for TagVersionCommand {
    type Context = TagVersionContext;

    fn init(&self) -> Vec<Step<TagVersionContext>> {
        let prompt = Arc::clone(&self.prompt);

        vec![
            Step::from_fn("Read tag info", |ctx: &mut TagVersionContext| {
                async move {
                    let tag = git::tag_info(&ctx.project_path)?
                        .ok_or_else(|| anyhow!("Can't find any version tag"))?;
                    ctx.tag = Some(tag);
                    Ok(())
                }
                .boxed()
            }),
            Step::from_fn("Update tag version", move |ctx: &mut TagVersionContext| {
                let prompt = Arc::clone(&prompt);
                async move {
                    let tag = ctx
                        .tag
                        .clone()
                        .ok_or_else(|| anyhow!("Can't find any version tag"))?;

                    println!(
                        "{} new commit(s) after {}",
                        tag.new_commits_count, tag.version
                    );

                    let choice = prompt.select("Select new version:", &bump_choices(&tag))?;
                    if choice == CANCEL_CHOICE {
                        info!("Tagging cancelled");
                        return Ok(());
                    }

                    let next = choice
                        .split_whitespace()
                        .last()
                        .ok_or_else(|| anyhow!("Invalid version choice"))?
                        .to_string();
                    git::add_tag(&ctx.project_path, &format!("v{next}"))?;
                    ctx.next_version = Some(next);
                    Ok(())
                }
                .boxed()
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_choices_cover_all_levels() {
        let tag = TagInfo {
            version: "1.2.3".to_string(),
            major: 1,
            minor: 2,
            patch: 3,
            new_commits_count: 4,
        };

        let choices = bump_choices(&tag);
        assert_eq!(
            choices,
            vec![
                "Cancel select",
                "PATCH 1.2.4",
                "MINOR 1.3.0",
                "MAJOR 2.0.0",
            ]
        );
    }
}
