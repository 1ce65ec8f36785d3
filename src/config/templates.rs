//! Remote template locations

use serde::{Deserialize, Serialize};

/// Token in template URLs replaced with the detected core branch (`8.3.x`)
pub const VERSION_TOKEN: &str = "{ver}";

const PROJECT_BASE: &str = "https://raw.githubusercontent.com/drupal-composer/drupal-project/8.x";

/// The templates fetched for every run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateName {
    /// Project manifest the new composer.json is built from
    Baseline,
    /// Manifest Drupal core itself ships, used to spot hand-added packages
    Reference,
    /// Drush policy file, written to `drush/`
    Drush,
    /// Composer script handler, written to `scripts/composer/`
    ScriptHandler,
    /// Suggested ignore rules, shown in the summary
    Ignore,
}

impl TemplateName {
    pub const ALL: [TemplateName; 5] = [
        TemplateName::Baseline,
        TemplateName::Reference,
        TemplateName::Drush,
        TemplateName::ScriptHandler,
        TemplateName::Ignore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateName::Baseline => "baseline",
            TemplateName::Reference => "reference",
            TemplateName::Drush => "drush",
            TemplateName::ScriptHandler => "script_handler",
            TemplateName::Ignore => "ignore",
        }
    }

    /// Directory (relative to the workspace) an auxiliary template is written to
    pub fn destination_dir(self) -> Option<&'static str> {
        match self {
            TemplateName::Drush => Some("drush"),
            TemplateName::ScriptHandler => Some("scripts/composer"),
            _ => None,
        }
    }
}

/// URLs of every remote template. `{ver}` is replaced by the core branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSet {
    pub baseline: String,
    pub reference: String,
    pub drush: String,
    pub script_handler: String,
    pub ignore: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            baseline: format!("{PROJECT_BASE}/composer.json"),
            reference: "https://raw.githubusercontent.com/drupal/drupal/{ver}/composer.json"
                .to_string(),
            drush: format!("{PROJECT_BASE}/drush/policy.drush.inc"),
            script_handler: format!("{PROJECT_BASE}/scripts/composer/ScriptHandler.php"),
            ignore: format!("{PROJECT_BASE}/.gitignore"),
        }
    }
}

impl TemplateSet {
    pub fn url(&self, name: TemplateName) -> &str {
        match name {
            TemplateName::Baseline => &self.baseline,
            TemplateName::Reference => &self.reference,
            TemplateName::Drush => &self.drush,
            TemplateName::ScriptHandler => &self.script_handler,
            TemplateName::Ignore => &self.ignore,
        }
    }

    /// URL of `name` with the version token substituted
    pub fn resolved_url(&self, name: TemplateName, core_branch: &str) -> String {
        self.url(name).replace(VERSION_TOKEN, core_branch)
    }
}

/// Last path segment of a URL, used as the file name of a written template
pub fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether a template URL points at a JSON document
pub fn is_json_url(url: &str) -> bool {
    file_name_from_url(url)
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("json"))
}
