//! Composer manifests
//!
//! Every JSON document is validated here, at the decode boundary, and turned
//! into typed values before any phase reads a field from it.

pub mod baseline;
pub mod local;

use serde_json::Value;

use crate::domain::ModuleRegistry;
use crate::error::{Result, manifest::invalid_template};

pub use baseline::{BaselineTemplate, rewrite_installer_paths};
pub use local::LocalManifest;

/// Read a `name -> constraint` section of a manifest document.
///
/// A missing section is empty; a section of any other shape is an error
/// described by the returned string.
pub(crate) fn dependency_section(
    document: &serde_json::Map<String, Value>,
    key: &str,
) -> std::result::Result<ModuleRegistry, String> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(ModuleRegistry::new()),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, constraint)| match constraint {
                Value::String(c) => Ok((name.clone(), c.clone())),
                other => Err(format!("\"{key}.{name}\" must be a string, found {other}")),
            })
            .collect(),
        Some(other) => Err(format!("\"{key}\" must be an object, found {other}")),
    }
}

/// The `require` section of the manifest Drupal core ships
pub fn reference_require(name: &str, document: &Value) -> Result<ModuleRegistry> {
    let Value::Object(object) = document else {
        return Err(invalid_template(name, "document is not a JSON object"));
    };
    dependency_section(object, "require").map_err(|reason| invalid_template(name, reason))
}
