// Versioned response cache.
// One directory per version name; each entry is a JSON metadata file plus a
// sibling raw body file. Writes go through temp file + rename so readers
// never observe a half-written entry.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuraError, Result};
use crate::net::{Request, Response};

use super::paths;

/// Metadata stored alongside each cached body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Request identity this entry answers (method + URL).
    pub identity: String,
    /// HTTP status of the stored response.
    pub status: u16,
    /// Response headers, in arrival order.
    pub headers: Vec<(String, String)>,
    /// When the response was stored.
    pub stored_at: DateTime<Utc>,
}

/// Root of all cache store versions.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    /// Open the storage at the platform cache directory.
    pub fn open() -> Result<Self> {
        let root = paths::default_root().ok_or(AuraError::NoCacheDir)?;
        Ok(Self { root })
    }

    /// Open the storage at an explicit root.
    pub fn open_at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle to the store with the given version name. The directory is
    /// created lazily on first write.
    pub fn store(&self, name: &str) -> CacheStore {
        CacheStore {
            dir: paths::store_dir(&self.root, name),
        }
    }

    /// Names of all store versions currently on disk.
    pub fn store_names(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                // Staging directories are not versions.
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a store version and everything in it.
    pub fn delete(&self, name: &str) -> Result<()> {
        let dir = paths::store_dir(&self.root, name);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    /// Commit a batch of entries to a store in one step.
    ///
    /// Entries are written to a staging directory first and only renamed
    /// into the store once every one of them is on disk, so a failure leaves
    /// the store exactly as it was.
    pub fn commit(&self, name: &str, entries: &[(Request, Response)]) -> Result<()> {
        let staging = self
            .root
            .join(format!(".staging-{}", paths::sanitize_name(name)));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let mut staged = Vec::with_capacity(entries.len());
        for (request, response) in entries {
            let stem = paths::entry_stem(request);
            write_entry(&staging, &stem, request, response)?;
            staged.push(stem);
        }

        let dir = paths::store_dir(&self.root, name);
        fs::create_dir_all(&dir)?;
        for stem in &staged {
            fs::rename(
                paths::body_path(&staging, stem),
                paths::body_path(&dir, stem),
            )?;
            fs::rename(
                paths::meta_path(&staging, stem),
                paths::meta_path(&dir, stem),
            )?;
        }
        fs::remove_dir_all(&staging)?;
        Ok(())
    }
}

/// One named cache store version.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Look up a stored response by request identity. Exact match only:
    /// method, path, and query must all agree.
    pub fn lookup(&self, request: &Request) -> Result<Option<Response>> {
        let stem = paths::entry_stem(request);
        let meta_path = paths::meta_path(&self.dir, &stem);
        if !meta_path.exists() {
            return Ok(None);
        }

        let meta: EntryMeta = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
        if meta.identity != request.identity() {
            return Ok(None);
        }

        let body = fs::read(paths::body_path(&self.dir, &stem))?;
        Ok(Some(Response {
            status: meta.status,
            headers: meta.headers,
            body,
        }))
    }

    /// Whether an entry exists for the request.
    pub fn contains(&self, request: &Request) -> bool {
        paths::meta_path(&self.dir, &paths::entry_stem(request)).exists()
    }

    /// Store a response under the request's identity. Atomic per entry;
    /// concurrent writers are last-write-wins.
    pub fn put(&self, request: &Request, response: &Response) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        write_entry(&self.dir, &paths::entry_stem(request), request, response)
    }

    /// Identities of every entry in the store, sorted.
    pub fn request_keys(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let meta: EntryMeta = serde_json::from_str(&fs::read_to_string(&path)?)?;
                keys.push(meta.identity);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write one entry. The body lands first; the metadata file gates lookups,
/// so a reader never sees metadata without a matching body.
fn write_entry(dir: &Path, stem: &str, request: &Request, response: &Response) -> Result<()> {
    write_atomic(&paths::body_path(dir, stem), &response.body)?;

    let meta = EntryMeta {
        identity: request.identity(),
        status: response.status,
        headers: response.headers.clone(),
        stored_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&meta)?;
    write_atomic(&paths::meta_path(dir, stem), json.as_bytes())?;
    Ok(())
}

/// Write atomically via temp file + rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("dat");
    let temp_path = path.with_extension(format!("{ext}.tmp"));

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use url::Url;

    fn request(path: &str) -> Request {
        Request::get(Url::parse(&format!("http://app.test{path}")).unwrap())
    }

    #[test]
    fn test_put_and_lookup_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = CacheStorage::open_at(temp.path());
        let store = storage.store("app-shell-v1");

        let request = request("/");
        let mut response = Response::new(200, "<html>home</html>");
        response
            .headers
            .push(("content-type".to_string(), "text/html".to_string()));

        store.put(&request, &response).unwrap();

        let found = store.lookup(&request).unwrap().unwrap();
        assert_eq!(found, response);
        assert!(store.contains(&request));
    }

    #[test]
    fn test_lookup_miss() {
        let temp = TempDir::new().unwrap();
        let store = CacheStorage::open_at(temp.path()).store("app-shell-v1");

        assert!(store.lookup(&request("/missing")).unwrap().is_none());
        assert!(!store.contains(&request("/missing")));
    }

    #[test]
    fn test_put_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = CacheStorage::open_at(temp.path()).store("app-shell-v1");
        let request = request("/static/style.css");

        store.put(&request, &Response::new(200, "old")).unwrap();
        store.put(&request, &Response::new(200, "new")).unwrap();

        let found = store.lookup(&request).unwrap().unwrap();
        assert_eq!(found.text(), "new");
        assert_eq!(store.request_keys().unwrap().len(), 1);
    }

    #[test]
    fn test_query_is_part_of_identity() {
        let temp = TempDir::new().unwrap();
        let store = CacheStorage::open_at(temp.path()).store("app-shell-v1");

        store
            .put(&request("/page?a=1"), &Response::new(200, "one"))
            .unwrap();

        assert!(store.lookup(&request("/page?a=2")).unwrap().is_none());
        assert!(store.lookup(&request("/page")).unwrap().is_none());
    }

    #[test]
    fn test_commit_is_all_at_once() {
        let temp = TempDir::new().unwrap();
        let storage = CacheStorage::open_at(temp.path());

        let entries = vec![
            (request("/"), Response::new(200, "home")),
            (request("/offline"), Response::new(200, "offline page")),
        ];
        storage.commit("app-shell-v1", &entries).unwrap();

        let store = storage.store("app-shell-v1");
        let keys = store.request_keys().unwrap();
        assert_eq!(
            keys,
            vec![
                "GET http://app.test/".to_string(),
                "GET http://app.test/offline".to_string(),
            ]
        );

        // No staging leftovers, exactly one version.
        assert_eq!(storage.store_names().unwrap(), vec!["app-shell-v1"]);
    }

    #[test]
    fn test_store_names_and_delete() {
        let temp = TempDir::new().unwrap();
        let storage = CacheStorage::open_at(temp.path());

        storage
            .store("app-shell-v1")
            .put(&request("/"), &Response::new(200, "v1"))
            .unwrap();
        storage
            .store("app-shell-v2")
            .put(&request("/"), &Response::new(200, "v2"))
            .unwrap();

        assert_eq!(
            storage.store_names().unwrap(),
            vec!["app-shell-v1", "app-shell-v2"]
        );

        storage.delete("app-shell-v1").unwrap();
        assert_eq!(storage.store_names().unwrap(), vec!["app-shell-v2"]);

        // Deleting a version that is already gone is fine.
        storage.delete("app-shell-v1").unwrap();
    }
}
