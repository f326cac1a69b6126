//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, init::InitArgs, list::ListArgs, new::NewArgs,
    render::RenderArgs, show::ShowArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "prompt-registry")]
#[command(author, version, about = "Prompt Registry - version-controlled prompt templates with variables")]
#[command(long_about = "Manage reusable, versioned prompt templates stored as plain YAML files, and render them with named variables.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Directory containing prompt templates (default: ./prompts)
    #[arg(long, short = 'd', global = true)]
    pub prompts_dir: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (no short flag; -v selects a template version)
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the prompts directory with an example template
    Init(InitArgs),

    /// List all available prompt templates
    List(ListArgs),

    /// Show details of a specific prompt template
    Show(ShowArgs),

    /// Render a prompt template with variables
    Render(RenderArgs),

    /// Validate all prompt templates
    Validate(ValidateArgs),

    /// Create a new prompt template
    New(NewArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for list and show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Styled, human-readable output
    #[default]
    Auto,
    /// YAML documents (full fidelity)
    Yaml,
    /// JSON (for programming)
    Json,
}
