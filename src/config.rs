// Worker configuration.
// Origin, cache version name, offline route, precache manifest, and
// static-asset markers, loadable from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Configuration for the offline cache worker.
///
/// Every field except `origin` has a default. The cache version name is the
/// invalidation lever: bumping it discards all previously cached content on
/// the next activate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Base origin that root-relative paths are resolved against.
    pub origin: Url,
    /// Cache store version name.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    /// Route served when a navigation fails and no cached copy exists.
    #[serde(default = "default_offline_route")]
    pub offline_route: String,
    /// App-shell paths precached at install, in order.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
    /// Path segment marking a URL as a static asset.
    #[serde(default = "default_static_segment")]
    pub static_segment: String,
    /// Path suffixes marking a URL as a static asset.
    #[serde(default = "default_static_extensions")]
    pub static_extensions: Vec<String>,
}

fn default_cache_name() -> String {
    "app-shell-v1".to_string()
}

fn default_offline_route() -> String {
    "/offline".to_string()
}

fn default_precache() -> Vec<String> {
    vec!["/".to_string(), "/offline".to_string()]
}

fn default_static_segment() -> String {
    "/static/".to_string()
}

fn default_static_extensions() -> Vec<String> {
    vec![".css".to_string(), ".js".to_string()]
}

impl WorkerConfig {
    /// Create a configuration with defaults for everything but the origin.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            cache_name: default_cache_name(),
            offline_route: default_offline_route(),
            precache: default_precache(),
            static_segment: default_static_segment(),
            static_extensions: default_static_extensions(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve a root-relative path against the configured origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let url = self.origin.join(path)?;
        Ok(url)
    }

    /// Whether a URL counts as a static asset worth caching on first fetch.
    pub fn is_static_asset(&self, url: &Url) -> bool {
        let path = url.path();
        path.contains(&self.static_segment)
            || self
                .static_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
    }
}
