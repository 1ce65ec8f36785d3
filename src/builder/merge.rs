//! Dependency merging

use serde_json::{Map, Value};

use super::scan::ScannedModules;
use crate::config::ModuleRole;
use crate::domain::{ModuleRegistry, manifest_diff, merge_first_wins};
use crate::manifest::{BaselineTemplate, rewrite_installer_paths};

/// The managed sections of the manifest being built
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDependencies {
    pub require: ModuleRegistry,
    pub require_dev: ModuleRegistry,
    pub installer_paths: Map<String, Value>,
}

impl MergedDependencies {
    /// Combine every dependency source, the first source defining a package
    /// winning: base modules, contrib modules, packages added to the local
    /// manifest by hand, then the baseline. Dev modules are merged the same
    /// way against the baseline's `require-dev`.
    pub fn merge(
        local_require: &ModuleRegistry,
        reference_require: &ModuleRegistry,
        baseline: &BaselineTemplate,
        scanned: &ScannedModules,
        app_dir: &str,
    ) -> Self {
        let manual = manifest_diff(local_require, reference_require);
        let require = merge_first_wins([
            scanned.registry(ModuleRole::Base),
            scanned.registry(ModuleRole::Contrib),
            &manual,
            &baseline.require,
        ]);
        let require_dev =
            merge_first_wins([scanned.registry(ModuleRole::Dev), &baseline.require_dev]);

        Self {
            require,
            require_dev,
            installer_paths: rewrite_installer_paths(&baseline.installer_paths, app_dir),
        }
    }

    /// Fill gaps with recovered constraints; existing entries are kept.
    /// Returns how many packages were added.
    pub fn absorb_recovered(&mut self, recovered: &ModuleRegistry) -> usize {
        let before = self.require.len();
        self.require = merge_first_wins([&self.require, recovered]);
        self.require.len() - before
    }

    pub fn render(&self, baseline: &BaselineTemplate) -> Value {
        baseline.render(&self.require, &self.require_dev, self.installer_paths.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::baseline_document;

    fn registry(entries: &[(&str, &str)]) -> ModuleRegistry {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn scanned(base: &[(&str, &str)], contrib: &[(&str, &str)], dev: &[(&str, &str)]) -> ScannedModules {
        let mut scanned = ScannedModules::default();
        scanned.roots.insert(ModuleRole::Base, registry(base));
        scanned.roots.insert(ModuleRole::Contrib, registry(contrib));
        scanned.roots.insert(ModuleRole::Dev, registry(dev));
        scanned
    }

    fn baseline() -> BaselineTemplate {
        BaselineTemplate::from_value(baseline_document()).unwrap()
    }

    #[test]
    fn test_precedence_base_contrib_manual_baseline() {
        let local = registry(&[
            ("composer/installers", "^1.0.24"),
            ("drupal/manual", "^2.0"),
            ("drupal/token", "^1.0"),
        ]);
        let reference = registry(&[("composer/installers", "^1.0.21")]);
        let modules = scanned(
            &[("drupal/a", "^1.0")],
            &[("drupal/a", "^2.0"), ("drupal/manual", "^3.0")],
            &[],
        );

        let merged = MergedDependencies::merge(&local, &reference, &baseline(), &modules, "web");
        assert_eq!(merged.require["drupal/a"], "^1.0");
        assert_eq!(merged.require["drupal/manual"], "^3.0");
        // hand-added packages beat the baseline
        assert_eq!(merged.require["drupal/token"], "^1.0");
        assert_eq!(merged.require["composer/installers"], "^1.2");
        assert_eq!(merged.require["drush/drush"], "~8.0");
    }

    #[test]
    fn test_dev_modules_feed_require_dev() {
        let modules = scanned(&[], &[], &[("drupal/devel", "1.2-dev")]);
        let merged = MergedDependencies::merge(
            &ModuleRegistry::new(),
            &ModuleRegistry::new(),
            &baseline(),
            &modules,
            "web",
        );
        assert_eq!(merged.require_dev["drupal/devel"], "1.2-dev");
        assert_eq!(merged.require_dev["behat/mink"], "~1.7");
        assert!(!merged.require.contains_key("drupal/devel"));
    }

    #[test]
    fn test_recovered_entries_only_fill_gaps() {
        let modules = scanned(&[("drupal/a", "^1.0")], &[], &[]);
        let mut merged = MergedDependencies::merge(
            &ModuleRegistry::new(),
            &ModuleRegistry::new(),
            &baseline(),
            &modules,
            "web",
        );
        let added =
            merged.absorb_recovered(&registry(&[("drupal/a", "^9.0"), ("drupal/b", "^1.0@alpha")]));
        assert_eq!(added, 1);
        assert_eq!(merged.require["drupal/a"], "^1.0");
        assert_eq!(merged.require["drupal/b"], "^1.0@alpha");
    }

    #[test]
    fn test_render_is_sorted_and_rewritten() {
        let modules = scanned(&[("drupal/zz", "^1.0")], &[("drupal/aa", "^1.0")], &[]);
        let merged = MergedDependencies::merge(
            &ModuleRegistry::new(),
            &ModuleRegistry::new(),
            &baseline(),
            &modules,
            "docroot",
        );
        let rendered = merged.render(&baseline());
        let keys: Vec<&String> = rendered["require"].as_object().unwrap().keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(rendered["extra"]["installer-paths"].get("docroot/core").is_some());
    }
}
