//! `ris g [generator] [plugin]` — run a generator against a plugin.

use crate::generator::{Generators, GeneratorSpec};
use crate::installer::Installer;
use crate::prompt::Prompt;
use crate::tasks::{read_configuration_step, scan_plugins_step, HasTaskContext, TaskContext};
use anyhow::Result;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use rispa_core::fs::FileSystem;
use rispa_core::manifest::canonical_plugin_name;
use rispa_core::{Plugin, PluginRegistry, RegistryError};
use rispa_pipeline::{Command, Step};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Context of one generate run. Field availability follows step order:
/// `plugin` is set by "Check plugin" or "Select plugin", `generators`
/// by "Init generators", `generator` by "Check generator".
pub struct GenerateContext {
    pub task: TaskContext,
    pub generator_name: Option<String>,
    pub plugin_name: Option<String>,
    pub plugin: Option<Plugin>,
    pub generators: Option<Generators>,
    pub generator: Option<GeneratorSpec>,
}

impl GenerateContext {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        project_path: PathBuf,
        generator_name: Option<String>,
        plugin_name: Option<String>,
    ) -> Self {
        Self {
            task: TaskContext::new(fs, project_path),
            generator_name,
            plugin_name,
            plugin: None,
            generators: None,
            generator: None,
        }
    }

    fn generators(&self) -> Result<&Generators, RegistryError> {
        self.generators
            .as_ref()
            .ok_or(RegistryError::ContextField("generators"))
    }

    fn generator(&self) -> Result<&GeneratorSpec, RegistryError> {
        self.generator
            .as_ref()
            .ok_or(RegistryError::ContextField("generator"))
    }

    fn is_feature_run(&self) -> bool {
        self.generator
            .as_ref()
            .is_some_and(GeneratorSpec::is_feature_generator)
    }
}

impl HasTaskContext for GenerateContext {
    fn task(&self) -> &TaskContext {
        &self.task
    }

    fn task_mut(&mut self) -> &mut TaskContext {
        &mut self.task
    }
}

/// Resolve a user-supplied plugin name: direct key (name or alias)
/// first, then the canonicalized form of a prefixed short name.
fn find_plugin<'a>(plugins: &'a PluginRegistry, name: &str) -> Option<&'a Plugin> {
    plugins.get(name).or_else(|| {
        canonical_plugin_name(name).and_then(|canonical| plugins.get(&canonical))
    })
}

fn check_plugin(ctx: &mut GenerateContext) -> BoxFuture<'_, Result<()>> {
    async move {
        let name = ctx
            .plugin_name
            .clone()
            .ok_or(RegistryError::ContextField("pluginName"))?;
        let plugin = find_plugin(ctx.task.plugins()?, &name).cloned();
        ctx.plugin = Some(plugin.ok_or(RegistryError::PluginNotFound(name))?);
        Ok(())
    }
    .boxed()
}

fn init_generators(ctx: &mut GenerateContext) -> BoxFuture<'_, Result<()>> {
    async move {
        let dirs: Vec<PathBuf> = ctx
            .task
            .plugins()?
            .unique()
            .filter_map(|plugin| plugin.generators.clone())
            .collect();

        let generators = Generators::configure(Arc::clone(&ctx.task.fs), dirs)?;
        if generators.is_empty() {
            return Err(RegistryError::NoGenerators.into());
        }
        ctx.generators = Some(generators);
        Ok(())
    }
    .boxed()
}

fn check_generator(ctx: &mut GenerateContext) -> BoxFuture<'_, Result<()>> {
    async move {
        let name = ctx
            .generator_name
            .clone()
            .ok_or(RegistryError::ContextField("generatorName"))?;
        let generator = ctx.generators()?.get(&name).cloned();
        ctx.generator = Some(generator.ok_or(RegistryError::GeneratorNotFound(name))?);
        Ok(())
    }
    .boxed()
}

pub struct GenerateCommand {
    prompt: Arc<dyn Prompt>,
    installer: Arc<dyn Installer>,
}

impl GenerateCommand {
    pub fn new(prompt: Arc<dyn Prompt>, installer: Arc<dyn Installer>) -> Self {
        Self { prompt, installer }
    }
}

impl Command for GenerateCommand {
    type Context = GenerateContext;

    fn init(&self) -> Vec<Step<GenerateContext>> {
        let select_generator_prompt = Arc::clone(&self.prompt);
        let select_plugin_prompt = Arc::clone(&self.prompt);
        let enter_plugin_prompt = Arc::clone(&self.prompt);
        let run_prompt = Arc::clone(&self.prompt);
        let installer = Arc::clone(&self.installer);

        vec![
            read_configuration_step(),
            scan_plugins_step(),
            Step::from_fn("Check plugin", check_plugin)
                .enabled(|ctx: &GenerateContext| ctx.plugin_name.is_some()),
            Step::from_fn("Init generators", init_generators),
            Step::from_fn("Select generator", move |ctx: &mut GenerateContext| {
                let prompt = Arc::clone(&select_generator_prompt);
                async move {
                    let choice = prompt.select("Select generator:", &ctx.generators()?.list())?;
                    ctx.generator_name = Some(choice);
                    Ok(())
                }
                .boxed()
            })
            .enabled(|ctx: &GenerateContext| ctx.generator_name.is_none()),
            Step::from_fn("Check generator", check_generator),
            Step::from_fn("Select plugin", move |ctx: &mut GenerateContext| {
                let prompt = Arc::clone(&select_plugin_prompt);
                async move {
                    let choice = {
                        let plugins = ctx.task.plugins()?;
                        let names: Vec<String> =
                            plugins.unique().map(|plugin| plugin.name.clone()).collect();
                        prompt.select("Select plugin:", &names)?
                    };
                    ctx.plugin = ctx.task.plugins()?.get(&choice).cloned();
                    ctx.plugin_name = Some(choice);
                    Ok(())
                }
                .boxed()
            })
            .enabled(|ctx: &GenerateContext| ctx.plugin_name.is_none())
            .skip(GenerateContext::is_feature_run),
            Step::from_fn("Enter plugin name", move |ctx: &mut GenerateContext| {
                let prompt = Arc::clone(&enter_plugin_prompt);
                async move {
                    let name = prompt.input("Enter plugin name:")?;
                    ctx.plugin_name = Some(name);
                    Ok(())
                }
                .boxed()
            })
            .enabled(|ctx: &GenerateContext| ctx.plugin_name.is_none())
            .skip(|ctx: &GenerateContext| !ctx.is_feature_run()),
            Step::from_fn("Run generator", move |ctx: &mut GenerateContext| {
                let prompt = Arc::clone(&run_prompt);
                async move {
                    let generator = ctx.generator()?.clone();

                    let destination = if generator.is_feature_generator() {
                        let plugin_name = ctx
                            .plugin_name
                            .clone()
                            .ok_or(RegistryError::ContextField("pluginName"))?;
                        let configuration = ctx.task.configuration()?;
                        ctx.task
                            .project_path
                            .join(&configuration.plugins_path)
                            .join(plugin_name)
                    } else {
                        ctx.plugin
                            .as_ref()
                            .ok_or(RegistryError::ContextField("plugin"))?
                            .path
                            .clone()
                    };

                    ctx.generators
                        .as_mut()
                        .ok_or(RegistryError::ContextField("generators"))?
                        .set_destination(destination);

                    let mut data = Map::new();
                    data.insert(
                        "pluginName".to_string(),
                        Value::String(ctx.plugin_name.clone().unwrap_or_default()),
                    );
                    data.extend(generator.run_prompts(prompt.as_ref())?);

                    generator
                        .run_actions(
                            ctx.task.fs.as_ref(),
                            ctx.generators()?.destination()?,
                            &data,
                        )
                        .into_result()
                }
                .boxed()
            }),
            Step::from_fn("Bootstrap plugin dependencies", move |ctx: &mut GenerateContext| {
                let installer = Arc::clone(&installer);
                async move {
                    let plugin_name = ctx
                        .plugin_name
                        .clone()
                        .ok_or(RegistryError::ContextField("pluginName"))?;
                    let configuration = ctx.task.configuration()?;
                    let path = ctx
                        .task
                        .project_path
                        .join(&configuration.plugins_path)
                        .join(plugin_name);
                    installer.install(&path)
                }
                .boxed()
            })
            .skip(|ctx: &GenerateContext| !ctx.is_feature_run()),
        ]
    }
}
