//! Composer package registry client
//!
//! Resolution runs in two phases. The root `packages.json` names a set of
//! provider shards; all shards are fetched concurrently and merged into one
//! package-to-hash table. The requested packages are then looked up in that
//! table and their metadata documents fetched concurrently.

pub mod schema;

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use tracing::{debug, info};
use url::Url;

use crate::error::{Result, registry::unavailable};
use crate::fetch::{Fetch, fetch_json};

use schema::{HASH_TOKEN, PACKAGE_TOKEN, PackageDocument, ProviderShard, RootManifest};

/// Outcome of resolving a set of package names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Package name to every version string the registry publishes
    pub packages: BTreeMap<String, Vec<String>>,
    /// Requested packages the registry knows nothing about
    pub unresolved: Vec<String>,
}

/// Client for a composer repository using provider shards
pub struct RegistryClient<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> RegistryClient<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Resolve `packages` against the repository at `repository`.
    ///
    /// Any failed fetch fails the whole resolution. Packages missing from the
    /// repository are not an error; they are listed in
    /// [`Resolution::unresolved`].
    pub async fn resolve_packages(
        &self,
        repository: &str,
        packages: &[String],
    ) -> Result<Resolution> {
        let requested: BTreeSet<&str> = packages.iter().map(String::as_str).collect();
        let provider_urls = self.provider_urls(repository).await?;

        let targets: Vec<(&str, &String)> = requested
            .iter()
            .filter_map(|name| provider_urls.get(*name).map(|url| (*name, url)))
            .collect();
        debug!(
            "Fetching metadata for {} of {} requested package(s)",
            targets.len(),
            requested.len()
        );

        let documents: Vec<PackageDocument> =
            try_join_all(targets.iter().map(|(_, url)| fetch_json(self.fetcher, url))).await?;

        let mut resolution = Resolution::default();
        for document in documents {
            for (name, versions) in document.packages {
                if !requested.contains(name.as_str()) {
                    continue;
                }
                let known = resolution.packages.entry(name).or_default();
                for version in versions.versions() {
                    if !known.contains(version) {
                        known.push(version.clone());
                    }
                }
            }
        }

        let mut seen = BTreeSet::new();
        resolution.unresolved = packages
            .iter()
            .filter(|name| !resolution.packages.contains_key(*name) && seen.insert(name.as_str()))
            .cloned()
            .collect();
        if !resolution.unresolved.is_empty() {
            debug!(
                "Package information could not be found for: {}",
                resolution.unresolved.join(", ")
            );
        }

        info!(
            "Resolved {} package(s) from {repository}",
            resolution.packages.len()
        );
        Ok(resolution)
    }

    /// Phase one: build the metadata URL of every package in the repository
    async fn provider_urls(&self, repository: &str) -> Result<BTreeMap<String, String>> {
        let base = repository.trim_end_matches('/');
        let root_url = format!("{base}/packages.json");
        let root: RootManifest = fetch_json(self.fetcher, &root_url).await?;

        let shard_urls: Vec<String> = root
            .provider_includes
            .iter()
            .map(|(template, hash)| {
                let path = template.replace(HASH_TOKEN, &hash.sha256);
                format!("{base}/{}", path.trim_start_matches('/'))
            })
            .collect();
        debug!("Fetching {} provider shard(s)", shard_urls.len());

        let shards: Vec<ProviderShard> =
            try_join_all(shard_urls.iter().map(|url| fetch_json(self.fetcher, url))).await?;

        let mut providers = BTreeMap::new();
        for shard in shards {
            providers.extend(shard.providers);
        }

        let repository_url = Url::parse(&format!("{base}/"))
            .map_err(|e| unavailable(repository, format!("invalid repository URL: {e}")))?;

        providers
            .into_iter()
            .map(|(name, hash)| {
                let path = root
                    .providers_url
                    .replace(PACKAGE_TOKEN, &name)
                    .replace(HASH_TOKEN, &hash.sha256);
                let url = repository_url
                    .join(&path)
                    .map_err(|e| unavailable(repository, format!("invalid provider URL {path}: {e}")))?;
                Ok((name, url.to_string()))
            })
            .collect()
    }
}
