//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Helpers that lay out Drupal installations, module trees and manifests in
//! a temp directory with a single function call.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, write_module, create_drupal_site};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     write_module(temp.path(), "token", Some("8.x-1.0"));
//!
//!     let (temp, app) = create_drupal_site("web", "~8.3.2");
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use serde_json::{Value, json};

use crate::config::TemplateSet;
use crate::error::FetchError;
use crate::fetch::Fetch;

/// Host serving every template in [`test_templates`]
pub const TEMPLATE_HOST: &str = "https://templates.example";

/// Package repository named by [`baseline_document`]
pub const REGISTRY_URL: &str = "https://packages.example/8";

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("dcb-test-")
        .tempdir()
        .expect("Failed to create temp directory")
}

/// Write `<root>/<name>/<name>.info.yml`, with a `version` line when given.
///
/// # Panics
///
/// Panics if the module directory cannot be written.
pub fn write_module(root: &Path, name: &str, version: Option<&str>) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create module directory");
    let mut contents = format!("name: {name}\ntype: module\ncore: 8.x\n");
    if let Some(version) = version {
        contents.push_str(&format!("version: '{version}'\n"));
    }
    std::fs::write(dir.join(format!("{name}.info.yml")), contents)
        .expect("Failed to write info file");
    dir
}

/// Create a workspace holding a Drupal root `app_dir` with its own composer.json.
///
/// Returns the `TempDir` (the workspace) and the path of the Drupal root.
///
/// # Panics
///
/// Panics if any step fails.
#[must_use]
pub fn create_drupal_site(app_dir: &str, core_constraint: &str) -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let app = temp.path().join(app_dir);
    std::fs::create_dir_all(&app).expect("Failed to create Drupal root");
    let manifest = serde_json::json!({
        "name": "drupal/drupal",
        "require": {
            "composer/installers": "^1.0.24",
            "wikimedia/composer-merge-plugin": "~1.4",
            "drupal/token": "^1.0"
        },
        "replace": { "drupal/core": core_constraint }
    });
    std::fs::write(
        app.join("composer.json"),
        serde_json::to_string_pretty(&manifest).expect("Failed to encode manifest"),
    )
    .expect("Failed to write composer.json");
    (temp, app)
}

/// In-memory [`crate::fetch::Fetch`] serving canned bodies by exact URL.
///
/// Unknown URLs answer with HTTP 404; URLs marked with [`StaticFetcher::failing`]
/// answer with a transport error. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, String>,
    failing: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    #[must_use]
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    #[must_use]
    pub fn with_json(self, url: &str, value: serde_json::Value) -> Self {
        let body = value.to_string();
        self.with_body(url, &body)
    }

    #[must_use]
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// URLs requested so far, in request order
    ///
    /// # Panics
    ///
    /// Panics if the request log lock is poisoned.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

impl Fetch for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(url.to_string());

        if self.failing.contains(url) {
            return Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Template URLs pointing at [`TEMPLATE_HOST`]
#[must_use]
pub fn test_templates() -> TemplateSet {
    TemplateSet {
        baseline: format!("{TEMPLATE_HOST}/project/composer.json"),
        reference: format!("{TEMPLATE_HOST}/core/{{ver}}/composer.json"),
        drush: format!("{TEMPLATE_HOST}/project/drush/policy.drush.inc"),
        script_handler: format!("{TEMPLATE_HOST}/project/scripts/composer/ScriptHandler.php"),
        ignore: format!("{TEMPLATE_HOST}/project/.gitignore"),
    }
}

/// A trimmed-down drupal-project manifest
#[must_use]
pub fn baseline_document() -> Value {
    json!({
        "name": "drupal-composer/drupal-project",
        "type": "project",
        "repositories": [
            {"type": "vcs", "url": "https://git.example/forks/installers"},
            {"type": "composer", "url": REGISTRY_URL}
        ],
        "require": {
            "composer/installers": "^1.2",
            "drupal/core": "~8.0",
            "drupal/token": "^1.5",
            "drush/drush": "~8.0"
        },
        "require-dev": {
            "behat/mink": "~1.7",
            "drupal/devel": "^1.0"
        },
        "extra": {
            "installer-paths": {
                "web/core": ["type:drupal-core"],
                "web/modules/contrib/{$name}": ["type:drupal-module"],
                "drush/contrib/{$name}": ["type:drupal-drush"]
            }
        }
    })
}

/// The manifest Drupal core ships for the `8.3.x` branch
#[must_use]
pub fn reference_document() -> Value {
    json!({
        "name": "drupal/drupal",
        "require": {
            "composer/installers": "^1.0.21",
            "wikimedia/composer-merge-plugin": "~1.4"
        }
    })
}

/// A [`StaticFetcher`] serving every template of [`test_templates`] for core `8.3.x`
#[must_use]
pub fn template_fetcher() -> StaticFetcher {
    StaticFetcher::default()
        .with_json(&format!("{TEMPLATE_HOST}/project/composer.json"), baseline_document())
        .with_json(
            &format!("{TEMPLATE_HOST}/core/8.3.x/composer.json"),
            reference_document(),
        )
        .with_body(
            &format!("{TEMPLATE_HOST}/project/drush/policy.drush.inc"),
            "<?php\n// drush policy\n",
        )
        .with_body(
            &format!("{TEMPLATE_HOST}/project/scripts/composer/ScriptHandler.php"),
            "<?php\nnamespace DrupalProject\\composer;\n",
        )
        .with_body(
            &format!("{TEMPLATE_HOST}/project/.gitignore"),
            "/vendor/\n/web/core/\n/web/modules/contrib/\n",
        )
}

/// Add provider shards to `fetcher` so that `packages` resolve in the
/// repository at [`REGISTRY_URL`]. Each entry is `(package, versions)`.
#[must_use]
pub fn with_registry(fetcher: StaticFetcher, packages: &[(&str, &[&str])]) -> StaticFetcher {
    let providers: serde_json::Map<String, Value> = packages
        .iter()
        .map(|(name, _)| ((*name).to_string(), json!({"sha256": "h1"})))
        .collect();
    let mut fetcher = fetcher
        .with_json(
            &format!("{REGISTRY_URL}/packages.json"),
            json!({
                "providers-url": "/8/%package%$%hash%.json",
                "provider-includes": {"drupal/provider$%hash%.json": {"sha256": "s1"}}
            }),
        )
        .with_json(
            &format!("{REGISTRY_URL}/drupal/provider$s1.json"),
            json!({ "providers": providers }),
        );
    for (name, versions) in packages {
        let listed: serde_json::Map<String, Value> = versions
            .iter()
            .map(|v| ((*v).to_string(), json!({})))
            .collect();
        let mut document = serde_json::Map::new();
        document.insert((*name).to_string(), Value::Object(listed));
        fetcher = fetcher.with_json(
            &format!("{REGISTRY_URL}/{name}$h1.json"),
            json!({ "packages": document }),
        );
    }
    fetcher
}
