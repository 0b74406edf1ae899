use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Project scaffolding CLI for plugin-based monorepos
#[derive(Parser, Debug)]
#[command(
    name = "ris",
    about = "Project scaffolding CLI for plugin-based monorepos",
    version,
    long_about = "ris discovers the plugins installed in a project, runs code \
                  generators against them, and automates version tagging.\n\n\
                  Examples:\n  \
                  ris g\n  \
                  ris g component webpack\n  \
                  ris tag-version\n  \
                  ris bootstrap"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        name = "g",
        about = "Run a generator",
        long_about = "Scans the project for plugins and runs the selected generator \
                      against an existing plugin, or scaffolds a new plugin for \
                      feature generators. Omitted arguments are prompted for."
    )]
    Generate(GenerateArgs),

    #[command(name = "tag-version", about = "Select and push the next version tag")]
    TagVersion(TagVersionArgs),

    #[command(about = "Install dependencies for the project and its plugins")]
    Bootstrap(BootstrapArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(value_name = "GENERATOR", help = "Generator name; prompted for when omitted")]
    pub generator: Option<String>,

    #[arg(value_name = "PLUGIN", help = "Target plugin name or alias")]
    pub plugin: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Project root; defaults to the current directory"
    )]
    pub project_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TagVersionArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Repository to tag; defaults to the current directory"
    )]
    pub project_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Project root; defaults to the current directory"
    )]
    pub project_path: Option<PathBuf>,
}
