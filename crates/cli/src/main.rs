use rispa_cli::cli::{BootstrapArgs, CliArgs, Commands, GenerateArgs, TagVersionArgs};
use rispa_cli::commands::{
    BootstrapCommand, BootstrapContext, GenerateCommand, GenerateContext, TagVersionCommand,
    TagVersionContext,
};
use rispa_cli::installer::NpmInstaller;
use rispa_cli::prompt::TerminalPrompt;
use rispa_cli::VERSION;

use clap::Parser;
use rispa_core::fs::{FileSystem, RealFileSystem};
use rispa_pipeline::Command;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("ris v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args).await,
        Commands::TagVersion(tag_args) => handle_tag_version(tag_args).await,
        Commands::Bootstrap(bootstrap_args) => handle_bootstrap(bootstrap_args).await,
    };

    std::process::exit(exit_code);
}

/// Resolve the project root, defaulting to the current directory.
fn resolve_project_path(path: Option<&Path>) -> Option<PathBuf> {
    let raw = match path {
        Some(path) => path.to_path_buf(),
        None => match env::current_dir() {
            Ok(cwd) => cwd,
            Err(err) => {
                error!("Can't determine current directory: {err}");
                return None;
            }
        },
    };

    match raw.canonicalize() {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            error!("Invalid project path {}: {err}", raw.display());
            None
        }
    }
}

async fn handle_generate(args: &GenerateArgs) -> i32 {
    let Some(project_path) = resolve_project_path(args.project_path.as_deref()) else {
        return 1;
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
    let command = GenerateCommand::new(Arc::new(TerminalPrompt::new()), Arc::new(NpmInstaller::new()));
    let mut ctx = GenerateContext::new(
        fs,
        project_path,
        args.generator.clone(),
        args.plugin.clone(),
    );

    match command.run(&mut ctx).await {
        Ok(_) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

async fn handle_tag_version(args: &TagVersionArgs) -> i32 {
    let Some(project_path) = resolve_project_path(args.project_path.as_deref()) else {
        return 1;
    };

    let command = TagVersionCommand::new(Arc::new(TerminalPrompt::new()));
    let mut ctx = TagVersionContext::new(project_path);

    match command.run(&mut ctx).await {
        Ok(_) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

async fn handle_bootstrap(args: &BootstrapArgs) -> i32 {
    let Some(project_path) = resolve_project_path(args.project_path.as_deref()) else {
        return 1;
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
    let command = BootstrapCommand::new(Arc::new(NpmInstaller::new()));
    let mut ctx = BootstrapContext::new(fs, project_path);

    match command.run(&mut ctx).await {
        Ok(_) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level_str = env::var("RISPA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter
                .add_directive(format!("rispa_cli={}", level).parse().unwrap())
                .add_directive(format!("rispa_core={}", level).parse().unwrap())
                .add_directive(format!("rispa_pipeline={}", level).parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
