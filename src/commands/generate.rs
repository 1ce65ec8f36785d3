//! Generate command implementation
//!
//! Collects the run options (from flags or prompts), drives the builder on a
//! current-thread runtime and prints the summary.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use console::Style;
use inquire::{Confirm, Select, Text};

use crate::builder::{
    ComposerBuilder, Interaction, Notice, RunOptions, RunSummary, manifest_to_string,
};
use crate::cli::GenerateArgs;
use crate::config::BuilderConfig;
use crate::error::{BuilderError, Result, fs::drupal_root_not_found, fs::io_error};
use crate::fetch::HttpFetcher;
use crate::progress::Spinner;
use crate::scanner::YamlDecoder;
use crate::version::ConstraintOperator;

pub fn run(workspace: Option<PathBuf>, args: GenerateArgs) -> Result<()> {
    let workspace = match workspace {
        Some(path) => path,
        None => std::env::current_dir()
            .map_err(|e| io_error(format!("Failed to get current directory: {e}")))?,
    };
    let config = BuilderConfig::load(args.config.as_deref(), &workspace)?;

    confirm_overwrite(&workspace, &args)?;
    let drupal_root = resolve_drupal_root(&workspace, &config, args.drupal_root.as_deref())?;
    let operator = match args.constraint {
        Some(operator) => operator,
        None => prompt_operator()?,
    };

    let options = RunOptions {
        workspace: workspace.clone(),
        drupal_root,
        operator,
        dry_run: args.dry_run,
        keep_app_manifest: args.keep_app_manifest,
    };

    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    let interaction = TerminalInteraction::new(args.recover_answer());
    let builder = ComposerBuilder::new(&config, &fetcher, &YamlDecoder, &interaction);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_error(format!("Failed to start async runtime: {e}")))?;
    let summary = runtime.block_on(builder.run(&options))?;

    if options.dry_run {
        print!("{}", manifest_to_string(&summary.manifest)?);
    }
    print_summary(&summary, &options);
    Ok(())
}

/// Ask before replacing an existing project composer.json
fn confirm_overwrite(workspace: &Path, args: &GenerateArgs) -> Result<()> {
    let target = workspace.join("composer.json");
    if args.yes || args.dry_run || !target.exists() {
        return Ok(());
    }

    let overwrite = Confirm::new(&format!("{} already exists. Overwrite it?", target.display()))
        .with_default(false)
        .with_help_message("A new composer.json is required to continue")
        .prompt()?;
    if overwrite {
        Ok(())
    } else {
        Err(BuilderError::Cancelled)
    }
}

/// Drupal root from the flag, or prompted until an existing directory is given
fn resolve_drupal_root(
    workspace: &Path,
    config: &BuilderConfig,
    flag: Option<&str>,
) -> Result<String> {
    if let Some(root) = flag {
        let root = root.trim_end_matches('/');
        if !workspace.join(root).is_dir() {
            return Err(drupal_root_not_found(workspace.join(root).display().to_string()));
        }
        return Ok(root.to_string());
    }

    loop {
        let answer = Text::new("Drupal root directory (relative to the workspace):")
            .with_default(&config.drupal_root)
            .prompt()?;
        let answer = answer.trim().trim_end_matches('/').to_string();
        if workspace.join(&answer).is_dir() {
            return Ok(answer);
        }
        eprintln!(
            "{} {} is not a directory",
            Style::new().red().bold().apply_to("error:"),
            workspace.join(&answer).display()
        );
    }
}

fn prompt_operator() -> Result<ConstraintOperator> {
    let operator = Select::new(
        "Version constraint operator for dependencies:",
        ConstraintOperator::ALL.to_vec(),
    )
    .with_starting_cursor(0)
    .without_filtering()
    .with_help_message("↑↓ to move, ENTER to select")
    .prompt()?;
    Ok(operator)
}

/// [`Interaction`] backed by the terminal
struct TerminalInteraction {
    recover: Option<bool>,
    spinner: RefCell<Option<Spinner>>,
}

impl TerminalInteraction {
    fn new(recover: Option<bool>) -> Self {
        Self {
            recover,
            spinner: RefCell::new(None),
        }
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish();
        }
    }
}

fn warning(message: &str) {
    eprintln!("{} {message}", Style::new().yellow().bold().apply_to("warning:"));
}

impl Interaction for TerminalInteraction {
    fn confirm_recovery(&self, packages: &[String]) -> Result<bool> {
        if let Some(answer) = self.recover {
            return Ok(answer);
        }
        self.stop_spinner();
        let answer = Confirm::new(&format!(
            "{} module(s) could not be parsed. Look them up on the package registry?",
            packages.len()
        ))
        .with_default(true)
        .with_help_message(&packages.join(", "))
        .prompt()?;
        Ok(answer)
    }

    fn notify(&self, notice: Notice<'_>) {
        match notice {
            Notice::Phase(_) => {}
            Notice::FetchStarted(message) => {
                self.stop_spinner();
                *self.spinner.borrow_mut() = Some(Spinner::start(message));
            }
            Notice::FetchFinished => self.stop_spinner(),
            Notice::ModuleUnparsable(failure) => {
                warning(&format!(
                    "Could not parse {}: {}",
                    failure.path.display(),
                    failure.reason
                ));
                eprintln!(
                    "  install it manually with: {}",
                    Style::new().cyan().apply_to(format!("composer require {}", failure.package))
                );
            }
            Notice::DuplicateModuleRoots { base, contrib } => warning(&format!(
                "Modules were found in both {base} and {contrib}; \
                 check for duplicates before running composer install"
            )),
            Notice::PackagesNotFound(packages) => warning(&format!(
                "Package information could not be found for: {}",
                packages.join(", ")
            )),
            Notice::RecoveryFailed(err) => warning(&format!(
                "Package registry lookup failed, continuing without it: {err}"
            )),
        }
    }
}

fn print_summary(summary: &RunSummary, options: &RunOptions) {
    let heading = Style::new().bold().green();
    let command = Style::new().cyan();

    eprintln!();
    if options.dry_run {
        eprintln!("{}", heading.apply_to("Dry run complete, no files were written."));
    } else {
        eprintln!(
            "{} {} module(s) merged, {} file(s) written.",
            heading.apply_to("All operations are complete!"),
            summary.module_count,
            summary.written.len()
        );
    }

    if !summary.unresolved.is_empty() {
        eprintln!();
        eprintln!("Install the modules that could not be resolved first:");
        eprintln!(
            "  {}",
            command.apply_to(format!("composer require {}", summary.unresolved.join(" ")))
        );
    }

    eprintln!();
    eprintln!("Then run:");
    eprintln!("  {}", command.apply_to("composer install"));
    eprintln!();
    eprintln!("We recommend clearing your modules directory before running composer install:");
    eprintln!(
        "  {}",
        command.apply_to(format!("rm -rf {}/modules/*", options.drupal_root))
    );

    if let Some(ignore) = &summary.ignore_rules {
        eprintln!();
        eprintln!("To keep composer-managed code out of your repository, add to .gitignore:");
        for line in ignore.lines().filter(|line| !line.trim().is_empty()) {
            eprintln!("  {}", command.apply_to(line));
        }
    }

    eprintln!();
    eprintln!(
        "{} the generated composer.json is a starting point; review it before committing.",
        Style::new().red().bold().apply_to("Note:")
    );

    if !summary.dev_packages.is_empty() {
        eprintln!();
        eprintln!(
            "{} consider upgrading these development releases: {}",
            Style::new().red().bold().apply_to("Dev modules:"),
            summary.dev_packages.join(", ")
        );
        eprintln!("If a release exists, install it with:");
        eprintln!(
            "  {}",
            command.apply_to(format!("composer require {}", summary.dev_packages.join(" ")))
        );
    }
}
