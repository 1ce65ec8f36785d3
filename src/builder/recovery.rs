//! Registry-backed recovery of modules whose local version is unusable

use tracing::debug;

use crate::domain::{DevLedger, ModuleRegistry};
use crate::error::{BuilderError, Result};
use crate::fetch::Fetch;
use crate::manifest::BaselineTemplate;
use crate::registry::RegistryClient;
use crate::version::{ConstraintOperator, normalize_registry_version, select_best_version};

/// Constraints recovered from the package registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recovery {
    pub require: ModuleRegistry,
    pub dev: DevLedger,
    /// Packages the registry had no usable version for
    pub unresolved: Vec<String>,
}

/// Look `packages` up in the baseline's package repository and derive a
/// constraint for each.
pub async fn recover<F: Fetch>(
    fetcher: &F,
    baseline: &BaselineTemplate,
    vendor_marker: &str,
    packages: &[String],
    operator: ConstraintOperator,
) -> Result<Recovery> {
    let repository = baseline
        .registry_url(vendor_marker)
        .ok_or(BuilderError::NoRegistryRepository)?;
    debug!("Recovering {} package(s) from {repository}", packages.len());

    let resolution = RegistryClient::new(fetcher)
        .resolve_packages(repository, packages)
        .await?;

    let mut recovery = Recovery {
        unresolved: resolution.unresolved,
        ..Recovery::default()
    };

    for (package, versions) in resolution.packages {
        let Some(best) = select_best_version(versions) else {
            recovery.unresolved.push(package);
            continue;
        };
        match normalize_registry_version(&best, operator) {
            Ok(normalized) => {
                if normalized.is_dev {
                    recovery.dev.record(&package);
                }
                debug!("Recovered {package} -> {}", normalized.constraint);
                recovery.require.insert(package, normalized.constraint);
            }
            Err(err) => {
                debug!("Could not use registry version of {package}: {err}");
                recovery.unresolved.push(package);
            }
        }
    }

    Ok(recovery)
}
