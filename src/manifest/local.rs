//! The Drupal root's own composer.json

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::ModuleRegistry;
use crate::error::{Result, manifest::invalid_shape, manifest::missing};

/// Package whose `replace` entry pins the core version
pub const CORE_PACKAGE: &str = "drupal/core";

#[derive(Debug, Deserialize)]
struct RawLocalManifest {
    #[serde(default)]
    replace: Option<BTreeMap<String, String>>,
    #[serde(default)]
    require: ModuleRegistry,
}

/// Validated local manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalManifest {
    pub path: PathBuf,
    /// Core version with everything but digits and dots removed (`8.3.2`)
    pub core_version: String,
    /// Template branch for this core version (`8.3.x`)
    pub core_branch: String,
    pub require: ModuleRegistry,
}

impl LocalManifest {
    /// Read `composer.json` from the Drupal root
    pub fn load(app_path: &Path) -> Result<Self> {
        let path = app_path.join("composer.json");
        if !path.is_file() {
            return Err(missing(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| invalid_shape(path.display().to_string(), e.to_string()))?;
        Self::from_json(&path, &contents)
    }

    pub fn from_json(path: &Path, contents: &str) -> Result<Self> {
        let display = path.display().to_string();
        let raw: RawLocalManifest =
            serde_json::from_str(contents).map_err(|e| invalid_shape(&display, e.to_string()))?;

        let replace = raw
            .replace
            .ok_or_else(|| invalid_shape(&display, "missing the \"replace\" section"))?;
        let pin = replace.get(CORE_PACKAGE).ok_or_else(|| {
            invalid_shape(&display, format!("\"replace\" does not pin {CORE_PACKAGE}"))
        })?;

        let core_version: String = pin
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let core_branch = core_branch(&core_version).ok_or_else(|| {
            invalid_shape(
                &display,
                format!("cannot read a major.minor core version from \"{pin}\""),
            )
        })?;
        debug!("Detected Drupal core {core_version} (branch {core_branch})");

        Ok(Self {
            path: path.to_path_buf(),
            core_version,
            core_branch,
            require: raw.require,
        })
    }
}

/// `8.3.2` -> `8.3.x`
fn core_branch(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            Some(format!("{major}.{minor}.x"))
        }
        _ => None,
    }
}
