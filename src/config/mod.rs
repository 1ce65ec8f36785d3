//! Configuration handling for drupal-composer-builder
//!
//! Configuration is optional. Every field has a default matching a stock
//! Drupal 8 site and the drupal-composer project template, and a YAML file
//! (`drupal-composer.yaml`) can override any of them.

pub mod templates;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, config::not_found, config::parse_failed};

pub use templates::{TemplateName, TemplateSet};

/// File name looked up in the workspace
pub const CONFIG_FILE_NAME: &str = "drupal-composer.yaml";

/// Environment variable overriding [`BuilderConfig::fetch_timeout_secs`]
pub const TIMEOUT_ENV: &str = "DCB_FETCH_TIMEOUT_SECS";

/// Role of a module root inside the Drupal application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleRole {
    /// Modules placed directly in `modules/`
    Base,
    /// Modules in `modules/contrib/`
    Contrib,
    /// Development-only modules, merged into `require-dev`
    Dev,
}

impl ModuleRole {
    pub const ALL: [ModuleRole; 3] = [ModuleRole::Base, ModuleRole::Contrib, ModuleRole::Dev];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleRole::Base => "base",
            ModuleRole::Contrib => "contrib",
            ModuleRole::Dev => "dev",
        }
    }
}

/// Module roots relative to the Drupal root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModulePaths {
    pub base: String,
    pub contrib: String,
    pub dev: String,
}

impl Default for ModulePaths {
    fn default() -> Self {
        Self {
            base: "modules".to_string(),
            contrib: "modules/contrib".to_string(),
            dev: "modules/development".to_string(),
        }
    }
}

impl ModulePaths {
    pub fn get(&self, role: ModuleRole) -> &str {
        match role {
            ModuleRole::Base => &self.base,
            ModuleRole::Contrib => &self.contrib,
            ModuleRole::Dev => &self.dev,
        }
    }
}

/// Builder configuration (`drupal-composer.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Drupal root offered when prompting, relative to the workspace
    pub drupal_root: String,

    /// Where modules live inside the Drupal root
    pub module_paths: ModulePaths,

    /// Remote templates fetched for every run
    pub templates: TemplateSet,

    /// Substring identifying the package repository in the baseline template
    pub vendor_marker: String,

    /// Upper bound for a single network request
    pub fetch_timeout_secs: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            drupal_root: "web".to_string(),
            module_paths: ModulePaths::default(),
            templates: TemplateSet::default(),
            vendor_marker: "drupal".to_string(),
            fetch_timeout_secs: 30,
        }
    }
}

impl BuilderConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration for a run.
    ///
    /// An explicit path must exist. Otherwise the workspace file is used,
    /// then the per-user file, then the built-in defaults.
    pub fn load(explicit: Option<&Path>, workspace: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => return Err(not_found(path.display().to_string())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(workspace),
        };

        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;
                Self::from_yaml(&contents)
                    .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?
            }
            None => Self::default(),
        };

        if let Some(secs) = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.fetch_timeout_secs = secs;
        }

        Ok(config)
    }

    fn discover(workspace: &Path) -> Option<PathBuf> {
        let local = workspace.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("drupal-composer-builder").join("config.yaml"))
            .filter(|path| path.is_file())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;
    use crate::test_fixtures::create_temp_dir;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.drupal_root, "web");
        assert_eq!(config.module_paths.get(ModuleRole::Contrib), "modules/contrib");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BuilderConfig::from_yaml(
            "drupal_root: docroot\nmodule_paths:\n  dev: modules/devel\n",
        )
        .unwrap();
        assert_eq!(config.drupal_root, "docroot");
        assert_eq!(config.module_paths.dev, "modules/devel");
        assert_eq!(config.module_paths.base, "modules");
        assert_eq!(config.vendor_marker, "drupal");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(BuilderConfig::from_yaml("").unwrap(), BuilderConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_from_workspace_file() {
        let temp = create_temp_dir();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "vendor_marker: packages.example\n",
        )
        .unwrap();
        let config = BuilderConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.vendor_marker, "packages.example");
    }

    #[test]
    #[serial]
    fn test_explicit_path_must_exist() {
        let temp = create_temp_dir();
        let err = BuilderConfig::load(Some(&temp.path().join("nope.yaml")), temp.path())
            .unwrap_err();
        assert!(matches!(err, BuilderError::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_names_file() {
        let temp = create_temp_dir();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "module_paths: [unclosed").unwrap();
        let err = BuilderConfig::load(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, BuilderError::ConfigParseFailed { ref path, .. } if path.ends_with("custom.yaml")));
    }

    #[test]
    #[serial]
    fn test_timeout_env_override() {
        let temp = create_temp_dir();
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::set_var(TIMEOUT_ENV, "7") };
        let config = BuilderConfig::load(None, temp.path());
        unsafe { std::env::remove_var(TIMEOUT_ENV) };
        assert_eq!(config.unwrap().fetch_timeout_secs, 7);
    }
}
