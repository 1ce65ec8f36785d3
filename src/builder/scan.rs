//! Module discovery across every configured module root

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::{ModulePaths, ModuleRole};
use crate::domain::{DevLedger, ErrorLedger, ModuleRegistry};
use crate::error::Result;
use crate::scanner::{MetadataDecoder, ModuleFailure, scan_root};
use crate::version::ConstraintOperator;

static EMPTY: ModuleRegistry = ModuleRegistry::new();

/// Modules found below the Drupal root, keyed by root role
#[derive(Debug, Clone, Default)]
pub struct ScannedModules {
    pub roots: BTreeMap<ModuleRole, ModuleRegistry>,
    pub errors: ErrorLedger,
    pub dev: DevLedger,
    pub failures: Vec<ModuleFailure>,
}

impl ScannedModules {
    pub fn registry(&self, role: ModuleRole) -> &ModuleRegistry {
        self.roots.get(&role).unwrap_or(&EMPTY)
    }

    /// Both the base and the contrib roots hold modules, which usually
    /// means the same module is installed twice
    pub fn has_duplicate_roots(&self) -> bool {
        !self.registry(ModuleRole::Base).is_empty()
            && !self.registry(ModuleRole::Contrib).is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.roots.values().map(ModuleRegistry::len).sum()
    }
}

/// Scan the base, contrib and dev roots of the Drupal application at `app_path`
pub fn scan_modules<D: MetadataDecoder>(
    app_path: &Path,
    paths: &ModulePaths,
    operator: ConstraintOperator,
    decoder: &D,
) -> Result<ScannedModules> {
    let mut scanned = ScannedModules::default();
    for role in ModuleRole::ALL {
        let root = app_path.join(paths.get(role));
        let outcome = scan_root(&root, operator, decoder)?;
        debug!(
            "{} root {}: {} module(s), {} unparsable",
            role.as_str(),
            root.display(),
            outcome.registry.len(),
            outcome.errors.len()
        );
        scanned.errors.extend(outcome.errors);
        scanned.dev.extend(outcome.dev);
        scanned.failures.extend(outcome.failures);
        scanned.roots.insert(role, outcome.registry);
    }
    Ok(scanned)
}
