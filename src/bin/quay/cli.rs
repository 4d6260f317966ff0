//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use quay::util::shell::ColorChoice;

/// Quay - dependency-aware release packaging for multi-product repositories
#[derive(Parser)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Search for Quay.toml from DIR instead of the current directory
    #[arg(long, global = true, value_name = "DIR", env = "QUAY_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Use this version instead of the one derived from git tags
    #[arg(long, global = true, value_name = "VERSION")]
    pub version_override: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and package products in dependency order
    Dist(DistArgs),

    /// Run the build step only, in dependency order
    Build(BuildArgs),

    /// Build docker images from packaged products
    Docker(DockerArgs),

    /// Print the product processing order
    Products(ProductsArgs),

    /// Print the resolved project version
    ProjectVersion,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct DistArgs {
    /// Products to package (default: all); dependencies are included
    pub products: Vec<String>,

    /// Report what would run without building or packaging
    #[arg(long)]
    pub dry_run: bool,

    /// Independent products processed at once
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Products to build (default: all); dependencies are included
    pub products: Vec<String>,
}

#[derive(Args)]
pub struct DockerArgs {
    /// Products whose images to build (default: all)
    pub products: Vec<String>,

    /// Report the images and tags without running docker
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Args)]
pub struct ProductsArgs {
    /// Restrict to these products and their dependencies
    pub products: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}
