//! Release ordering used to pick a registry version for a package
//!
//! Registries list every tagged release plus development branches. The
//! best candidate is the highest tagged release; development branches are
//! only used when nothing else has been published.

use std::cmp::Ordering;

/// Whether a registry version names a development branch (`dev-1.x`, `1.x-dev`)
pub fn is_dev_version(version: &str) -> bool {
    version.starts_with("dev-") || version.ends_with("-dev") || version == "dev"
}

/// Sortable view of a tagged release such as `1.10.0-beta2`
#[derive(Debug, PartialEq, Eq)]
struct ReleaseKey {
    numbers: Vec<u64>,
    stability: u8,
    stability_number: u64,
}

impl ReleaseKey {
    fn parse(version: &str) -> Self {
        let (numeric, tag) = version
            .trim_start_matches('v')
            .split_once('-')
            .unwrap_or((version.trim_start_matches('v'), ""));

        let numbers = numeric
            .split('.')
            .map(|part| part.parse::<u64>().unwrap_or(0))
            .collect();

        let name = tag.trim_end_matches(|c: char| c.is_ascii_digit());
        let counter = &tag[name.len()..];
        let stability = match name.to_ascii_lowercase().as_str() {
            "" | "stable" | "patch" | "p" => 4,
            "rc" => 3,
            "beta" | "b" => 2,
            "alpha" | "a" => 1,
            _ => 0,
        };

        Self {
            numbers,
            stability,
            stability_number: counter.parse().unwrap_or(0),
        }
    }
}

impl PartialOrd for ReleaseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for i in 0..len {
            let a = self.numbers.get(i).copied().unwrap_or(0);
            let b = other.numbers.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.stability
            .cmp(&other.stability)
            .then(self.stability_number.cmp(&other.stability_number))
    }
}

/// Sort registry versions best-first: tagged releases from highest to
/// lowest, followed by development branches in descending lexical order.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| match (is_dev_version(a), is_dev_version(b)) {
        (false, false) => ReleaseKey::parse(b).cmp(&ReleaseKey::parse(a)),
        (true, true) => b.cmp(a),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
    });
}

/// Pick the version to pin for a package.
///
/// A single published version is used as-is. Otherwise development branches
/// are dropped and the highest tagged release wins; if only development
/// branches exist the first of them (after sorting) is used.
pub fn select_best_version<I, S>(versions: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut versions: Vec<String> = versions.into_iter().map(Into::into).collect();
    if versions.len() <= 1 {
        return versions.pop();
    }
    sort_versions(&mut versions);
    versions.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_markers() {
        assert!(is_dev_version("dev-1.x"));
        assert!(is_dev_version("1.x-dev"));
        assert!(!is_dev_version("1.0.0-alpha5"));
        assert!(!is_dev_version("2.0.0"));
    }

    #[test]
    fn test_drops_dev_entry() {
        let picked = select_best_version(["dev-1.x", "1.0.0-alpha5"]);
        assert_eq!(picked.as_deref(), Some("1.0.0-alpha5"));
    }

    #[test]
    fn test_independent_of_response_order() {
        let picked = select_best_version(["1.0.0-alpha5", "dev-1.x"]);
        assert_eq!(picked.as_deref(), Some("1.0.0-alpha5"));
    }

    #[test]
    fn test_prefers_highest_release() {
        let picked = select_best_version([
            "dev-2.x",
            "1.9.0",
            "2.0.0-beta1",
            "1.10.0",
            "2.0.0-alpha3",
            "2.0.0-beta2",
        ]);
        assert_eq!(picked.as_deref(), Some("2.0.0-beta2"));
    }

    #[test]
    fn test_stable_beats_prerelease_of_same_number() {
        let picked = select_best_version(["2.0.0-rc1", "2.0.0", "dev-2.x"]);
        assert_eq!(picked.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_single_version_used_as_is() {
        assert_eq!(
            select_best_version(["dev-1.x"]).as_deref(),
            Some("dev-1.x")
        );
        assert_eq!(select_best_version(Vec::<String>::new()), None);
    }

    #[test]
    fn test_only_dev_branches() {
        let picked = select_best_version(["dev-1.x", "dev-2.x"]);
        assert_eq!(picked.as_deref(), Some("dev-2.x"));
    }
}
