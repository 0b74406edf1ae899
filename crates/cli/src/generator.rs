//! Directory-backed generator engine.
//!
//! Each plugin may ship generator definitions under its generators
//! directory: every subdirectory holding a `generator.json` is one
//! generator, declaring runtime prompts and template file actions.

use crate::prompt::Prompt;
use anyhow::{anyhow, Context, Result};
use rispa_core::fs::{FileSystem, FileType};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const GENERATOR_MANIFEST: &str = "generator.json";

#[derive(Debug, Clone, Deserialize)]
pub struct PromptSpec {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionSpec {
    /// Target path relative to the destination; may carry placeholders.
    pub path: String,
    /// Template file relative to the generator directory.
    pub template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorManifest {
    /// Feature generators scaffold a new plugin directory instead of
    /// targeting an existing plugin.
    #[serde(default)]
    pub feature: bool,
    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone)]
pub struct ActionFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ActionReport {
    pub failures: Vec<ActionFailure>,
}

impl ActionReport {
    /// Aggregate per-file failures into one fatal error.
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let summary = self
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.path, failure.error))
            .collect::<Vec<_>>()
            .join("\n");
        Err(anyhow!(summary))
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorSpec {
    pub name: String,
    pub dir: PathBuf,
    manifest: GeneratorManifest,
}

impl GeneratorSpec {
    pub fn is_feature_generator(&self) -> bool {
        self.manifest.feature
    }

    /// Collect answers for the declared prompts into a data map.
    pub fn run_prompts(&self, prompt: &dyn Prompt) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        for spec in &self.manifest.prompts {
            let answer = prompt.input(&spec.message)?;
            data.insert(spec.name.clone(), Value::String(answer));
        }
        Ok(data)
    }

    /// Render every action template into `destination`, substituting
    /// `{{key}}` placeholders from `data`. Per-file failures are
    /// collected rather than short-circuiting, so one report covers the
    /// whole run.
    pub fn run_actions(
        &self,
        fs: &dyn FileSystem,
        destination: &Path,
        data: &Map<String, Value>,
    ) -> ActionReport {
        let mut report = ActionReport::default();
        for action in &self.manifest.actions {
            if let Err(err) = self.apply_action(fs, destination, action, data) {
                report.failures.push(ActionFailure {
                    path: action.path.clone(),
                    error: err.to_string(),
                });
            }
        }
        report
    }

    fn apply_action(
        &self,
        fs: &dyn FileSystem,
        destination: &Path,
        action: &ActionSpec,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let template = fs.read_to_string(&self.dir.join(&action.template))?;
        let target = destination.join(render(&action.path, data));

        if let Some(parent) = target.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.write_string(&target, &render(&template, data))
    }
}

fn render(template: &str, data: &Map<String, Value>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in data {
        if let Value::String(text) = value {
            rendered = rendered.replace(&format!("{{{{{key}}}}}"), text);
        }
    }
    rendered
}

/// The engine configured over every plugin's generator directory.
pub struct Generators {
    fs: Arc<dyn FileSystem>,
    destination: Option<PathBuf>,
    generators: BTreeMap<String, GeneratorSpec>,
}

impl Generators {
    /// Scan `dirs` for generator definitions. On a name collision the
    /// first sighting wins.
    pub fn configure(
        fs: Arc<dyn FileSystem>,
        dirs: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self> {
        let mut generators = BTreeMap::new();

        for dir in dirs {
            if !fs.is_dir(&dir) {
                continue;
            }
            for entry in fs.read_dir(&dir)? {
                if entry.file_type != FileType::Directory {
                    continue;
                }
                let manifest_path = entry.path.join(GENERATOR_MANIFEST);
                if !fs.is_file(&manifest_path) {
                    continue;
                }

                let content = fs.read_to_string(&manifest_path)?;
                let manifest: GeneratorManifest = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid generator manifest {:?}", manifest_path))?;

                debug!(generator = %entry.name, dir = %dir.display(), "Registered generator");
                generators.entry(entry.name.clone()).or_insert(GeneratorSpec {
                    name: entry.name,
                    dir: entry.path,
                    manifest,
                });
            }
        }

        Ok(Self {
            fs,
            destination: None,
            generators,
        })
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn list(&self) -> Vec<String> {
        self.generators.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&GeneratorSpec> {
        self.generators.get(name)
    }

    pub fn set_destination(&mut self, path: PathBuf) {
        self.destination = Some(path);
    }

    pub fn destination(&self) -> Result<&Path> {
        self.destination
            .as_deref()
            .ok_or_else(|| anyhow!("Generator destination is not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use rispa_core::fs::MockFileSystem;

    fn engine_fs() -> Arc<MockFileSystem> {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/cwd/packages/rispa-ui/lib/generators/component/generator.json",
            r#"{
                "prompts": [{ "name": "componentName", "message": "Component name:" }],
                "actions": [{ "path": "src/{{componentName}}.js", "template": "component.tmpl" }]
            }"#,
        );
        fs.add_file(
            "/cwd/packages/rispa-ui/lib/generators/component/component.tmpl",
            "export const {{componentName}} = () => null\n",
        );
        Arc::new(fs)
    }

    fn configure(fs: &Arc<MockFileSystem>) -> Generators {
        Generators::configure(
            Arc::clone(fs) as Arc<dyn FileSystem>,
            vec![PathBuf::from("/cwd/packages/rispa-ui/lib/generators")],
        )
        .unwrap()
    }

    #[test]
    fn test_configure_finds_generators() {
        let fs = engine_fs();
        let generators = configure(&fs);

        assert_eq!(generators.list(), vec!["component"]);
        assert!(generators.contains("component"));
        assert!(!generators.contains("page"));
    }

    #[test]
    fn test_missing_dirs_are_ignored() {
        let fs = Arc::new(MockFileSystem::new());
        let generators = Generators::configure(
            Arc::clone(&fs) as Arc<dyn FileSystem>,
            vec![PathBuf::from("/cwd/packages/rispa-core/lib/generators")],
        )
        .unwrap();

        assert!(generators.is_empty());
    }

    #[test]
    fn test_run_prompts_collects_answers() {
        let fs = engine_fs();
        let generators = configure(&fs);
        let prompt = ScriptedPrompt::new(["Button"]);

        let data = generators
            .get("component")
            .unwrap()
            .run_prompts(&prompt)
            .unwrap();
        assert_eq!(data["componentName"], Value::String("Button".to_string()));
    }

    #[test]
    fn test_run_actions_renders_templates() {
        let fs = engine_fs();
        let generators = configure(&fs);

        let mut data = Map::new();
        data.insert(
            "componentName".to_string(),
            Value::String("Button".to_string()),
        );

        let report = generators.get("component").unwrap().run_actions(
            fs.as_ref(),
            Path::new("/cwd/packages/rispa-ui"),
            &data,
        );
        report.into_result().unwrap();

        let rendered = fs
            .read_to_string(Path::new("/cwd/packages/rispa-ui/src/Button.js"))
            .unwrap();
        assert_eq!(rendered, "export const Button = () => null\n");
    }

    #[test]
    fn test_action_failures_are_aggregated() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/cwd/gen/broken/generator.json",
            r#"{ "actions": [{ "path": "out.js", "template": "missing.tmpl" }] }"#,
        );
        let generators = Generators::configure(
            Arc::new(fs) as Arc<dyn FileSystem>,
            vec![PathBuf::from("/cwd/gen")],
        )
        .unwrap();

        let report = generators.get("broken").unwrap().run_actions(
            generators.fs().as_ref(),
            Path::new("/cwd/out"),
            &Map::new(),
        );

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().starts_with("out.js: "));
    }
}
