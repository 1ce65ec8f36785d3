//! Set difference between dependency maps

use std::collections::BTreeMap;

/// Entries of `a` whose key is absent from `b`, with values taken from `a`.
///
/// Used to find dependencies that were added to a project by hand and are
/// not part of the stock Drupal manifest.
pub fn manifest_diff<V: Clone>(
    a: &BTreeMap<String, V>,
    b: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    a.iter()
        .filter(|(key, _)| !b.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_keeps_only_keys_missing_from_b() {
        let local = map(&[
            ("composer/installers", "^1.0.24"),
            ("drupal/core", "~8.3"),
            ("drupal/token", "^1.0"),
        ]);
        let stock = map(&[("composer/installers", "^1.0.21"), ("drupal/core", "~8.2")]);
        let diff = manifest_diff(&local, &stock);
        assert_eq!(diff, map(&[("drupal/token", "^1.0")]));
    }

    #[test]
    fn test_self_diff_is_empty() {
        let a = map(&[("x/y", "1"), ("x/z", "2")]);
        assert!(manifest_diff(&a, &a).is_empty());
    }

    #[test]
    fn test_empty_left_side() {
        let b = map(&[("x/y", "1")]);
        assert!(manifest_diff(&BTreeMap::new(), &b).is_empty());
    }

    #[test]
    fn test_values_come_from_left_side() {
        let a = map(&[("x/y", "left")]);
        let b = map(&[("x/z", "right")]);
        assert_eq!(manifest_diff(&a, &b), map(&[("x/y", "left")]));
    }
}
