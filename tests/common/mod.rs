//! Common test utilities for drupal-composer-builder integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use httptest::{Expectation, Server, matchers::eq, matchers::request, responders::status_code};
use tempfile::TempDir;

/// A project workspace holding a Drupal site
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn new() -> Self {
        let temp = tempfile::Builder::new()
            .prefix("dcb-it-")
            .tempdir()
            .expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a workspace with a Drupal root at `web/` pinned to core 8.3.2
    pub fn with_drupal_site() -> Self {
        let workspace = Self::new();
        workspace.write_file(
            "web/composer.json",
            r#"{
    "name": "drupal/drupal",
    "require": {
        "composer/installers": "^1.0.24",
        "wikimedia/composer-merge-plugin": "~1.4",
        "drupal/token": "^1.0"
    },
    "replace": {
        "drupal/core": "~8.3.2"
    }
}"#,
        );
        workspace
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write `<root>/<name>/<name>.info.yml` below the workspace
    pub fn write_module(&self, root: &str, name: &str, version: Option<&str>) {
        let mut contents = format!("name: {name}\ntype: module\ncore: 8.x\n");
        if let Some(version) = version {
            contents.push_str(&format!("version: '{version}'\n"));
        }
        self.write_file(&format!("{root}/{name}/{name}.info.yml"), &contents);
    }

    /// Point every template and the package repository at `server`
    pub fn write_config(&self, server: &Server) {
        let config = format!(
            "templates:\n  \
               baseline: {base}/project/composer.json\n  \
               reference: {base}/core/{{ver}}/composer.json\n  \
               drush: {base}/project/drush/policy.drush.inc\n  \
               script_handler: {base}/project/scripts/composer/ScriptHandler.php\n  \
               ignore: {base}/project/.gitignore\n\
             vendor_marker: 127.0.0.1\n\
             fetch_timeout_secs: 5\n",
            base = server.url_str("").trim_end_matches('/')
        );
        self.write_file("drupal-composer.yaml", &config);
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline project template naming the server's package repository
pub fn baseline_template(server: &Server) -> String {
    serde_json::json!({
        "name": "drupal-composer/drupal-project",
        "type": "project",
        "repositories": [
            {"type": "composer", "url": server.url_str("/8")}
        ],
        "require": {
            "composer/installers": "^1.2",
            "drupal/core": "~8.0",
            "drush/drush": "~8.0"
        },
        "require-dev": {"behat/mink": "~1.7"},
        "extra": {
            "installer-paths": {
                "web/core": ["type:drupal-core"],
                "web/modules/contrib/{$name}": ["type:drupal-module"]
            }
        }
    })
    .to_string()
}

/// Serve every template once, for core branch `8.3.x`
pub fn serve_templates(server: &Server) {
    let templates = [
        ("/project/composer.json", baseline_template(server)),
        (
            "/core/8.3.x/composer.json",
            r#"{"require": {"composer/installers": "^1.0.21", "wikimedia/composer-merge-plugin": "~1.4"}}"#
                .to_string(),
        ),
        ("/project/drush/policy.drush.inc", "<?php\n".to_string()),
        (
            "/project/scripts/composer/ScriptHandler.php",
            "<?php\n".to_string(),
        ),
        ("/project/.gitignore", "/vendor/\n/web/core/\n".to_string()),
    ];
    for (path, body) in templates {
        server.expect(
            Expectation::matching(request::method_path("GET", path))
                .respond_with(status_code(200).body(body)),
        );
    }
}

/// Serve a one-shard provider registry under `/8` listing `package` with `versions`
pub fn serve_registry(server: &Server, package: &str, versions: &[&str]) {
    let listed: serde_json::Map<String, serde_json::Value> = versions
        .iter()
        .map(|v| ((*v).to_string(), serde_json::json!({})))
        .collect();
    let mut document = serde_json::Map::new();
    document.insert(package.to_string(), serde_json::Value::Object(listed));

    let responses = [
        (
            "/8/packages.json".to_string(),
            serde_json::json!({
                "providers-url": "/8/%package%$%hash%.json",
                "provider-includes": {"p/all$%hash%.json": {"sha256": "s1"}}
            }),
        ),
        (
            "/8/p/all$s1.json".to_string(),
            serde_json::json!({"providers": {package: {"sha256": "h1"}}}),
        ),
        (
            format!("/8/{package}$h1.json"),
            serde_json::json!({ "packages": document }),
        ),
    ];
    for (path, body) in responses {
        server.expect(
            Expectation::matching(request::method_path("GET", eq(path)))
                .respond_with(status_code(200).body(body.to_string())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_drupal_site_fixture() {
        let workspace = TestWorkspace::with_drupal_site();
        workspace.write_module("web/modules/contrib", "token", Some("8.x-1.1"));
        assert!(workspace.file_exists("web/composer.json"));
        assert!(workspace.file_exists("web/modules/contrib/token/token.info.yml"));
    }
}
