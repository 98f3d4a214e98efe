// Cache path utilities.
// Resolves the cache root and builds per-version, per-entry file paths.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::net::Request;

/// Default cache root (~/.cache/aura on Linux).
pub fn default_root() -> Option<PathBuf> {
    ProjectDirs::from("", "", "aura").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding one cache store version.
pub fn store_dir(root: &Path, name: &str) -> PathBuf {
    root.join(sanitize_name(name))
}

/// File stem identifying a request inside a store: md5 of its identity.
pub fn entry_stem(request: &Request) -> String {
    format!("{:x}", md5::compute(request.identity()))
}

/// Metadata file for an entry.
pub fn meta_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.json"))
}

/// Body file for an entry.
pub fn body_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.bin"))
}

/// Sanitize a store name for use as a directory name.
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
