use clap::Parser;
use std::path::PathBuf;

use crate::version::ConstraintOperator;

fn parse_constraint(value: &str) -> Result<ConstraintOperator, String> {
    value.parse().map_err(|e: crate::error::BuilderError| e.to_string())
}

/// Arguments for generate command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Interactive run from the project root:\n    drupal-composer-builder generate\n\n\
                  Non-interactive run:\n    drupal-composer-builder generate --drupal-root web --constraint caret -y --recover\n\n\
                  Preview without touching any file:\n    drupal-composer-builder generate --dry-run")]
pub struct GenerateArgs {
    /// Drupal root relative to the workspace (prompted when omitted)
    #[arg(long, value_name = "DIR")]
    pub drupal_root: Option<String>,

    /// Constraint operator: caret (^), tilde (~) or exact (prompted when omitted)
    #[arg(long, value_name = "OPERATOR", value_parser = parse_constraint)]
    pub constraint: Option<ConstraintOperator>,

    /// Overwrite an existing composer.json without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Look unparsable modules up on the package registry without asking
    #[arg(long, overrides_with = "no_recover")]
    pub recover: bool,

    /// Never look unparsable modules up on the package registry
    #[arg(long, overrides_with = "recover")]
    pub no_recover: bool,

    /// Print the generated manifest instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Leave the Drupal root's own composer.json untouched
    #[arg(long)]
    pub keep_app_manifest: bool,

    /// Configuration file (defaults to drupal-composer.yaml in the workspace)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Answer to the recovery question given on the command line, if any
    pub fn recover_answer(&self) -> Option<bool> {
        match (self.recover, self.no_recover) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
