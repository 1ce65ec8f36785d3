//! Documents served by a composer package repository
//!
//! Only the fields the builder consumes are modelled; anything else in the
//! responses is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::IgnoredAny};

/// Placeholder for a package name in `providers-url`
pub const PACKAGE_TOKEN: &str = "%package%";

/// Placeholder for a content hash in `providers-url` and shard paths
pub const HASH_TOKEN: &str = "%hash%";

/// Content hash reference used by shard and provider listings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentHash {
    pub sha256: String,
}

/// `packages.json` at the repository root
#[derive(Debug, Clone, Deserialize)]
pub struct RootManifest {
    /// Template for per-package metadata, e.g. `/8/%package%$%hash%.json`
    #[serde(rename = "providers-url")]
    pub providers_url: String,

    /// Shard path template (containing `%hash%`) to the shard's hash
    #[serde(
        rename = "provider-includes",
        default,
        deserialize_with = "map_or_empty_list"
    )]
    pub provider_includes: BTreeMap<String, ContentHash>,
}

/// One page of the package index
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderShard {
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub providers: BTreeMap<String, ContentHash>,
}

/// Release metadata of one package, keyed by version string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Releases(
    #[serde(deserialize_with = "map_or_empty_list")] serde_json::Map<String, serde_json::Value>,
);

impl Releases {
    pub fn versions(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Per-package metadata: package name to version string to release metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDocument {
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub packages: BTreeMap<String, Releases>,
}

/// Decode a map that PHP-backed repositories serialize as `[]` when empty.
fn map_or_empty_list<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrList<T> {
        Map(T),
        List(Vec<IgnoredAny>),
    }

    match MapOrList::<T>::deserialize(deserializer)? {
        MapOrList::Map(map) => Ok(map),
        MapOrList::List(items) if items.is_empty() => Ok(T::default()),
        MapOrList::List(_) => Err(serde::de::Error::custom(
            "expected a map, found a non-empty list",
        )),
    }
}
