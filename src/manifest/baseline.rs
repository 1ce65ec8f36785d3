//! The project template the generated manifest is built from

use serde::Deserialize;
use serde_json::{Map, Value};

use super::dependency_section;
use crate::domain::ModuleRegistry;
use crate::error::{Result, manifest::invalid_template};

/// Web root the baseline template's installer paths are anchored under
pub const TEMPLATE_WEB_ROOT: &str = "web";

/// A `repositories` entry of a composer manifest
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Repository {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Validated baseline template.
///
/// The fetched document is kept (key order included) so that sections the
/// builder does not manage are emitted untouched.
#[derive(Debug, Clone)]
pub struct BaselineTemplate {
    document: Map<String, Value>,
    pub require: ModuleRegistry,
    pub require_dev: ModuleRegistry,
    pub installer_paths: Map<String, Value>,
    pub repositories: Vec<Repository>,
}

impl BaselineTemplate {
    const NAME: &'static str = "baseline";

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(document) = value else {
            return Err(invalid_template(Self::NAME, "document is not a JSON object"));
        };

        let require = dependency_section(&document, "require")
            .map_err(|reason| invalid_template(Self::NAME, reason))?;
        let require_dev = dependency_section(&document, "require-dev")
            .map_err(|reason| invalid_template(Self::NAME, reason))?;

        let installer_paths = match document.get("extra").map(|extra| extra.get("installer-paths")) {
            None | Some(None) => Map::new(),
            Some(Some(Value::Object(paths))) => paths.clone(),
            Some(Some(_)) => {
                return Err(invalid_template(
                    Self::NAME,
                    "\"extra.installer-paths\" must be an object",
                ));
            }
        };
        if let Some(extra) = document.get("extra") {
            if !extra.is_object() {
                return Err(invalid_template(Self::NAME, "\"extra\" must be an object"));
            }
        }

        let repositories = match document.get("repositories") {
            None => Vec::new(),
            Some(Value::Array(entries)) => repository_entries(entries.iter())?,
            Some(Value::Object(entries)) => repository_entries(entries.values())?,
            Some(_) => {
                return Err(invalid_template(
                    Self::NAME,
                    "\"repositories\" must be a list",
                ));
            }
        };

        Ok(Self {
            document,
            require,
            require_dev,
            installer_paths,
            repositories,
        })
    }

    /// URL of the first composer repository whose URL contains `marker`
    pub fn registry_url(&self, marker: &str) -> Option<&str> {
        self.repositories
            .iter()
            .filter_map(|repo| repo.url.as_deref())
            .find(|url| url.contains(marker))
    }

    /// Produce the final manifest with the managed sections replaced.
    ///
    /// Dependency maps are emitted in ascending key order.
    pub fn render(
        &self,
        require: &ModuleRegistry,
        require_dev: &ModuleRegistry,
        installer_paths: Map<String, Value>,
    ) -> Value {
        let mut document = self.document.clone();
        document.insert("require".to_string(), sorted_section(require));
        document.insert("require-dev".to_string(), sorted_section(require_dev));

        let extra = document
            .entry("extra")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(extra) = extra {
            extra.insert("installer-paths".to_string(), Value::Object(installer_paths));
        }

        Value::Object(document)
    }
}

/// Decode `repositories` entries. `false` disables a repository and is skipped.
fn repository_entries<'a, I>(entries: I) -> Result<Vec<Repository>>
where
    I: Iterator<Item = &'a Value>,
{
    entries
        .filter(|entry| !matches!(entry, Value::Bool(false)))
        .enumerate()
        .map(|(index, entry)| {
            Repository::deserialize(entry).map_err(|e| {
                invalid_template(
                    BaselineTemplate::NAME,
                    format!("repository entry {index} is malformed: {e}"),
                )
            })
        })
        .collect()
}

fn sorted_section(registry: &ModuleRegistry) -> Value {
    Value::Object(
        registry
            .iter()
            .map(|(name, constraint)| (name.clone(), Value::String(constraint.clone())))
            .collect(),
    )
}

/// Re-anchor installer paths under `web/` to the application directory.
///
/// Keys outside the template web root, and every value, are kept unchanged.
pub fn rewrite_installer_paths(paths: &Map<String, Value>, app_dir: &str) -> Map<String, Value> {
    let app_dir = app_dir.trim_end_matches('/');
    paths
        .iter()
        .map(|(key, value)| {
            let rewritten = key
                .strip_prefix(TEMPLATE_WEB_ROOT)
                .filter(|rest| rest.starts_with('/'))
                .map_or_else(
                    || key.clone(),
                    |rest| format!("{app_dir}/{}", rest.trim_start_matches('/')),
                );
            (rewritten, value.clone())
        })
        .collect()
}
