//! Domain models for drupal-composer-builder
//!
//! Pure data types shared by the scanning, registry and builder phases.

pub mod diff;
pub mod ledger;

use std::collections::BTreeMap;

pub use diff::manifest_diff;
pub use ledger::{DevLedger, ErrorLedger};

/// Vendor prefix of every Drupal project on the package registry
pub const DRUPAL_VENDOR: &str = "drupal";

/// Package identifier (`vendor/name`) to dependency constraint.
///
/// A `BTreeMap` keeps keys unique and iterates in ascending lexical order,
/// which is the order the emitted manifest uses.
pub type ModuleRegistry = BTreeMap<String, String>;

/// Build the registry package name for a Drupal module directory
pub fn package_name(module: &str) -> String {
    format!("{DRUPAL_VENDOR}/{module}")
}

/// Combine registries where the earliest source that defines a key wins.
pub fn merge_first_wins<'a, I>(sources: I) -> ModuleRegistry
where
    I: IntoIterator<Item = &'a ModuleRegistry>,
{
    let mut merged = ModuleRegistry::new();
    for source in sources {
        for (name, constraint) in source {
            merged
                .entry(name.clone())
                .or_insert_with(|| constraint.clone());
        }
    }
    merged
}
