//! Module scanning
//!
//! Enumerates module directories below a module root and reads each module's
//! `<name>.info.yml` into a composer constraint.

pub mod decoder;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::{DevLedger, ErrorLedger, ModuleRegistry, package_name};
use crate::error::{BuilderError, Result, manifest::malformed_version};
use crate::version::{ConstraintOperator, normalize};

pub use decoder::{MetadataDecoder, YamlDecoder};

/// A module whose metadata could not be turned into a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    pub package: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Everything learned from scanning one module root
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub registry: ModuleRegistry,
    pub errors: ErrorLedger,
    pub dev: DevLedger,
    pub failures: Vec<ModuleFailure>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List the immediate, non-hidden child directories of `root`.
///
/// A root that does not exist yields no modules: projects rarely use every
/// conventional module location.
pub fn scan_directory(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        debug!("Module root {} does not exist, skipping", root.display());
        return Ok(Vec::new());
    }

    let mut modules = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                let path = e.path().unwrap_or(root);
                warn!("Skipping unreadable entry {}: {e}", path.display());
                continue;
            }
            Err(e) => {
                return Err(BuilderError::Io {
                    message: format!("Failed to read module directory {}: {e}", root.display()),
                });
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping module directory with non UTF-8 name in {}", root.display());
            continue;
        };
        if !is_hidden(name) {
            modules.push(name.to_string());
        }
    }
    Ok(modules)
}

/// Path of the metadata file for `module` below `root`
pub fn info_path(root: &Path, module: &str) -> PathBuf {
    root.join(module).join(format!("{module}.info.yml"))
}

/// Read the raw version string of a module.
///
/// Returns `Ok(None)` when the module has no info file; such directories are
/// skipped silently.
pub fn read_module_version<D: MetadataDecoder>(
    root: &Path,
    module: &str,
    decoder: &D,
) -> Result<Option<String>> {
    let path = info_path(root, module);
    if !path.is_file() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| malformed_version(package_name(module), e.to_string()))?;
    let info = decoder
        .decode(&contents)
        .map_err(|reason| malformed_version(package_name(module), reason))?;

    match info.version {
        Some(version) => Ok(Some(version)),
        None => Err(malformed_version(
            package_name(module),
            "the info file has no version field",
        )),
    }
}

/// Scan one module root and normalize every module found in it.
///
/// Per-module failures never stop the scan: the module is left out of the
/// registry and recorded in the error ledger instead.
pub fn scan_root<D: MetadataDecoder>(
    root: &Path,
    operator: ConstraintOperator,
    decoder: &D,
) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    for module in scan_directory(root)? {
        let package = package_name(&module);
        let result = read_module_version(root, &module, decoder).and_then(|raw| {
            raw.map(|raw| {
                normalize(&raw, operator).map_err(|e| malformed_version(&package, e.to_string()))
            })
            .transpose()
        });

        match result {
            Ok(Some(normalized)) => {
                if normalized.is_dev {
                    outcome.dev.record(&package);
                }
                debug!("{package} -> {}", normalized.constraint);
                outcome.registry.insert(package, normalized.constraint);
            }
            Ok(None) => debug!("{} has no info file, skipping", module),
            Err(err) => {
                let path = info_path(root, &module);
                let reason = match err {
                    BuilderError::MalformedVersion { reason, .. } => reason,
                    other => other.to_string(),
                };
                debug!("Could not parse {}: {reason}", path.display());
                outcome.errors.record(&package);
                outcome.failures.push(ModuleFailure {
                    package,
                    path,
                    reason,
                });
            }
        }
    }

    Ok(outcome)
}
