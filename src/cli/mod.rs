//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - generate: Generate command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod generate;

pub use completions::CompletionsArgs;
pub use generate::GenerateArgs;

/// Drupal composer builder
///
/// Build a composer.json for an existing Drupal 8 site from the modules it has installed.
#[derive(Parser, Debug)]
#[command(
    name = "drupal-composer-builder",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Generate a composer.json for an existing Drupal 8 site",
    long_about = "Reads the modules installed in a Drupal 8 site, converts their versions into \
                  composer constraints and merges them with the drupal-composer project template \
                  into a new composer.json at the project root.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  drupal-composer-builder generate                          \x1b[90m# Answer every question interactively\x1b[0m\n   \
                  drupal-composer-builder generate --drupal-root web -y     \x1b[90m# Overwrite composer.json without asking\x1b[0m\n   \
                  drupal-composer-builder generate --constraint tilde       \x1b[90m# Use ~ constraints\x1b[0m\n   \
                  drupal-composer-builder generate --dry-run --no-recover   \x1b[90m# Print the manifest only\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "DCB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build composer.json from the installed modules
    Generate(GenerateArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
