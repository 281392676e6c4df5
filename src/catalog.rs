use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A library as listed in the catalog file (`libraries.yml`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Library {
    /// Unique name of the library, e.g. `"redis"`.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub star_count: Option<String>,
    /// Popularity counter used to order the catalog listing.
    #[serde(default)]
    pub pull_count: u64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// The per-library version document stored under `data/<library>`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LibraryVersion {
    pub name: String,
    #[serde(default, rename = "urlHub")]
    pub hub_url: String,
    #[serde(default, rename = "urlRepository")]
    pub repository_url: String,
    /// Versions in file order; neither unique nor sorted.
    #[serde(default, rename = "version")]
    pub versions: Vec<Version>,
}

/// One published version of a library.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Version {
    pub version: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub date: String,
    /// Distribution channel name (e.g. `"alpine"`) to the builds published on it.
    #[serde(default)]
    pub distributions: BTreeMap<String, Vec<Distribution>>,
}

/// A packaged build target (image) of a version.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Distribution {
    pub name: String,
    pub release_name: String,
    pub release: f32,
    pub image: String,
    pub weight: i64,
    pub tags: Vec<String>,
    pub url_dockerfile: String,
    pub image_repository: String,
}

impl Version {
    /// Keeps a version when it starts with `prefix` (an empty prefix matches everything)
    /// and is either a final release or prereleases are wanted.
    pub fn matches(&self, prefix: &str, include_prerelease: bool) -> bool {
        (prefix.is_empty() || self.version.starts_with(prefix))
            && (include_prerelease || !self.prerelease)
    }
}

impl LibraryVersion {
    /// Filters `versions` in place, preserving order.
    pub fn retain_matching(&mut self, prefix: &str, include_prerelease: bool) {
        self.versions.retain(|v| v.matches(prefix, include_prerelease));
    }

    /// Distinct distribution channel names across all versions, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .versions
            .iter()
            .flat_map(|v| v.distributions.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
