//! The composer.json build, run as a sequence of typed phases
//!
//! ```text
//! Start -> LocalManifestLoaded -> RemoteTemplatesLoaded -> ModulesScanned
//!       -> Merged -> [ErrorsPending -> Recovered] -> Written -> Complete
//! ```
//!
//! Each phase consumes the validated output of the previous ones. Phase
//! errors abort the run, except those raised while recovering, which are
//! reported and skipped.

pub mod merge;
pub mod recovery;
pub mod scan;
pub mod templates;
pub mod writer;

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::{BuilderConfig, ModuleRole};
use crate::error::{BuilderError, Result, fs::drupal_root_not_found};
use crate::fetch::Fetch;
use crate::manifest::LocalManifest;
use crate::scanner::{MetadataDecoder, ModuleFailure};
use crate::version::ConstraintOperator;

pub use merge::MergedDependencies;
pub use recovery::Recovery;
pub use scan::ScannedModules;
pub use templates::RemoteTemplates;
pub use writer::{OutputPlan, manifest_to_string};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Start,
    LocalManifestLoaded,
    RemoteTemplatesLoaded,
    ModulesScanned,
    Merged,
    ErrorsPending,
    Recovered,
    Written,
    Complete,
}

impl RunPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            RunPhase::Start => "start",
            RunPhase::LocalManifestLoaded => "local manifest loaded",
            RunPhase::RemoteTemplatesLoaded => "remote templates loaded",
            RunPhase::ModulesScanned => "modules scanned",
            RunPhase::Merged => "merged",
            RunPhase::ErrorsPending => "errors pending",
            RunPhase::Recovered => "recovered",
            RunPhase::Written => "written",
            RunPhase::Complete => "complete",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the operator should hear about while a run progresses
#[derive(Debug)]
pub enum Notice<'a> {
    Phase(RunPhase),
    /// A network batch is starting
    FetchStarted(&'static str),
    FetchFinished,
    ModuleUnparsable(&'a ModuleFailure),
    DuplicateModuleRoots { base: &'a str, contrib: &'a str },
    PackagesNotFound(&'a [String]),
    RecoveryFailed(&'a BuilderError),
}

/// The operator side of a run
pub trait Interaction {
    /// Ask whether the registry should be queried for `packages`
    fn confirm_recovery(&self, packages: &[String]) -> Result<bool>;

    fn notify(&self, notice: Notice<'_>);
}

/// Per-run choices
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workspace: PathBuf,
    /// Drupal root, relative to the workspace
    pub drupal_root: String,
    pub operator: ConstraintOperator,
    pub dry_run: bool,
    pub keep_app_manifest: bool,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub manifest: Value,
    /// Files written, in write order (empty for a dry run)
    pub written: Vec<PathBuf>,
    pub module_count: usize,
    /// Packages pinned to a development release
    pub dev_packages: Vec<String>,
    /// Packages whose local version could not be read
    pub unparsable: Vec<String>,
    /// Unparsable packages that recovery could not resolve either
    pub unresolved: Vec<String>,
    pub recovered: usize,
    pub ignore_rules: Option<String>,
}

/// Drives one run through every phase
pub struct ComposerBuilder<'a, F, D, I> {
    config: &'a BuilderConfig,
    fetcher: &'a F,
    decoder: &'a D,
    interaction: &'a I,
}

impl<'a, F, D, I> ComposerBuilder<'a, F, D, I>
where
    F: Fetch,
    D: MetadataDecoder,
    I: Interaction,
{
    pub fn new(config: &'a BuilderConfig, fetcher: &'a F, decoder: &'a D, interaction: &'a I) -> Self {
        Self {
            config,
            fetcher,
            decoder,
            interaction,
        }
    }

    fn enter(&self, phase: RunPhase) {
        info!("Phase: {phase}");
        self.interaction.notify(Notice::Phase(phase));
    }

    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        self.enter(RunPhase::Start);
        let app_path = options.workspace.join(&options.drupal_root);
        if !app_path.is_dir() {
            return Err(drupal_root_not_found(app_path.display().to_string()));
        }

        let local = LocalManifest::load(&app_path)?;
        info!(
            "Loaded {} (Drupal core {})",
            local.path.display(),
            local.core_version
        );
        self.enter(RunPhase::LocalManifestLoaded);

        self.interaction
            .notify(Notice::FetchStarted("Retrieving remote templates"));
        let remote = templates::fetch_templates(
            self.fetcher,
            &self.config.templates,
            &local.core_branch,
        )
        .await;
        self.interaction.notify(Notice::FetchFinished);
        let remote = remote?;
        self.enter(RunPhase::RemoteTemplatesLoaded);

        let scanned = self.scan(&app_path, options.operator)?;
        self.enter(RunPhase::ModulesScanned);

        let mut merged = MergedDependencies::merge(
            &local.require,
            &remote.reference_require,
            &remote.baseline,
            &scanned,
            &options.drupal_root,
        );
        self.enter(RunPhase::Merged);

        let mut dev = scanned.dev.clone();
        let mut unresolved = Vec::new();
        let mut recovered = 0;
        if !scanned.errors.is_empty() {
            self.enter(RunPhase::ErrorsPending);
            unresolved = scanned.errors.packages().to_vec();
            let recovery = if self.interaction.confirm_recovery(scanned.errors.packages())? {
                self.recover(&remote, scanned.errors.packages(), options.operator)
                    .await
            } else {
                info!("Recovery declined");
                None
            };
            if let Some(recovery) = recovery {
                recovered = merged.absorb_recovered(&recovery.require);
                dev.extend(recovery.dev);
                unresolved.retain(|package| !recovery.require.contains_key(package));
                self.enter(RunPhase::Recovered);
            }
        }

        let manifest = merged.render(&remote.baseline);
        let written = if options.dry_run {
            info!("Dry run, nothing written");
            Vec::new()
        } else {
            writer::write_outputs(&OutputPlan {
                workspace: &options.workspace,
                app_path: &app_path,
                manifest: &manifest,
                aux_files: &remote.aux_files(),
                blank_app_manifest: !options.keep_app_manifest,
            })?
        };
        self.enter(RunPhase::Written);

        let summary = RunSummary {
            manifest,
            written,
            module_count: scanned.module_count(),
            dev_packages: dev.packages().to_vec(),
            unparsable: scanned.errors.packages().to_vec(),
            unresolved,
            recovered,
            ignore_rules: remote.ignore_rules(),
        };
        self.enter(RunPhase::Complete);
        Ok(summary)
    }

    fn scan(&self, app_path: &Path, operator: ConstraintOperator) -> Result<ScannedModules> {
        let paths = &self.config.module_paths;
        let scanned = scan::scan_modules(app_path, paths, operator, self.decoder)?;
        for failure in &scanned.failures {
            self.interaction.notify(Notice::ModuleUnparsable(failure));
        }
        if scanned.has_duplicate_roots() {
            debug!(
                "Modules found in both {} and {}",
                paths.get(ModuleRole::Base),
                paths.get(ModuleRole::Contrib)
            );
            self.interaction.notify(Notice::DuplicateModuleRoots {
                base: paths.get(ModuleRole::Base),
                contrib: paths.get(ModuleRole::Contrib),
            });
        }
        Ok(scanned)
    }

    /// Recovery never fails the run: errors are reported and `None` returned
    async fn recover(
        &self,
        remote: &RemoteTemplates,
        packages: &[String],
        operator: ConstraintOperator,
    ) -> Option<Recovery> {
        self.interaction
            .notify(Notice::FetchStarted("Querying the package registry"));
        let result = recovery::recover(
            self.fetcher,
            &remote.baseline,
            &self.config.vendor_marker,
            packages,
            operator,
        )
        .await;
        self.interaction.notify(Notice::FetchFinished);

        match result {
            Ok(recovery) => {
                if !recovery.unresolved.is_empty() {
                    self.interaction
                        .notify(Notice::PackagesNotFound(&recovery.unresolved));
                }
                Some(recovery)
            }
            Err(err) => {
                debug!("Recovery failed, continuing without it: {err}");
                self.interaction.notify(Notice::RecoveryFailed(&err));
                None
            }
        }
    }
}
