//! drupal-composer-builder
//!
//! Builds a composer.json for an existing Drupal 8 site: installed modules
//! are scanned, their versions converted into composer constraints and the
//! result merged with the drupal-composer project template.

use clap::Parser;
use miette::Diagnostic;

mod builder;
mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod fetch;
mod manifest;
mod progress;
mod registry;
mod scanner;
mod version;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Install the log subscriber; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
