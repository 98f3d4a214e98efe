// Worker lifecycle.
// Install precaches the app shell under the current version name; activate
// purges superseded versions and takes control of open pages.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::WorkerConfig;
use crate::error::{AuraError, Result};
use crate::net::{Fetcher, Request, Response};
use crate::store::CacheStorage;

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerPhase {
    /// Constructed, nothing precached yet.
    #[default]
    New,
    /// Precaching the app shell.
    Installing,
    /// Installed, ready to take over from an older version.
    Waiting,
    /// Purging superseded versions.
    Activating,
    /// Controlling pages and intercepting fetches.
    Activated,
    /// Install failed; an older version stays in control.
    Redundant,
}

impl WorkerPhase {
    pub fn display(&self) -> &'static str {
        match self {
            WorkerPhase::New => "new",
            WorkerPhase::Installing => "installing",
            WorkerPhase::Waiting => "waiting",
            WorkerPhase::Activating => "activating",
            WorkerPhase::Activated => "activated",
            WorkerPhase::Redundant => "redundant",
        }
    }
}

/// Service-worker-style offline cache manager.
///
/// Lifecycle handlers are called explicitly by the host: `install`, then
/// `activate`, then any number of `handle_fetch` calls.
pub struct ServiceWorker {
    pub(super) config: WorkerConfig,
    pub(super) storage: CacheStorage,
    pub(super) fetcher: Arc<dyn Fetcher>,
    pub(super) revalidations: Mutex<Vec<JoinHandle<()>>>,
    phase: WorkerPhase,
    skip_waiting: bool,
    claimed: bool,
}

impl ServiceWorker {
    pub fn new(config: WorkerConfig, storage: CacheStorage, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            storage,
            fetcher,
            revalidations: Mutex::new(Vec::new()),
            phase: WorkerPhase::New,
            skip_waiting: false,
            claimed: false,
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Whether the worker asked to bypass the wait for older instances.
    pub fn skips_waiting(&self) -> bool {
        self.skip_waiting
    }

    /// Whether the worker claimed already-open pages.
    pub fn controls_clients(&self) -> bool {
        self.claimed
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Precache the app shell under the current version name.
    ///
    /// All-or-nothing: any unreachable manifest entry aborts the install and
    /// leaves every store on disk untouched, so an older version (if any)
    /// stays in control.
    pub async fn install(&mut self) -> Result<()> {
        self.phase = WorkerPhase::Installing;
        match self.precache_shell().await {
            Ok(count) => {
                self.skip_waiting = true;
                self.phase = WorkerPhase::Waiting;
                info!(
                    cache = %self.config.cache_name,
                    entries = count,
                    "app shell precached"
                );
                Ok(())
            }
            Err(err) => {
                self.phase = WorkerPhase::Redundant;
                Err(err)
            }
        }
    }

    async fn precache_shell(&self) -> Result<usize> {
        let mut batch: Vec<(Request, Response)> = Vec::with_capacity(self.config.precache.len());

        for path in &self.config.precache {
            let url = match self.config.resolve(path) {
                Ok(url) => url,
                Err(_) => {
                    return Err(AuraError::InstallAborted { url: path.clone() });
                }
            };
            let request = Request::get(url);

            match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => batch.push((request, response)),
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "precache rejected");
                    return Err(AuraError::InstallAborted {
                        url: request.url.to_string(),
                    });
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "precache fetch failed");
                    return Err(AuraError::InstallAborted {
                        url: request.url.to_string(),
                    });
                }
            }
        }

        self.storage.commit(&self.config.cache_name, &batch)?;
        Ok(batch.len())
    }

    /// Take over from any previous version: delete every store whose name
    /// differs from the current one and claim open pages. Entries are never
    /// migrated; a version bump discards all prior cached data.
    pub fn activate(&mut self) -> Result<()> {
        self.phase = WorkerPhase::Activating;

        for name in self.storage.store_names()? {
            if name != self.config.cache_name {
                self.storage.delete(&name)?;
                debug!(store = %name, "superseded cache version deleted");
            }
        }

        self.claimed = true;
        self.phase = WorkerPhase::Activated;
        info!(cache = %self.config.cache_name, "worker activated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockFetcher;
    use tempfile::TempDir;
    use url::Url;

    fn worker_at(temp: &TempDir, mock: Arc<MockFetcher>) -> ServiceWorker {
        let config = WorkerConfig::new(Url::parse("http://app.test").unwrap());
        let storage = CacheStorage::open_at(temp.path());
        ServiceWorker::new(config, storage, mock)
    }

    #[tokio::test]
    async fn test_install_precaches_manifest() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockFetcher::new());
        mock.respond_text("http://app.test/", 200, "home");
        mock.respond_text("http://app.test/offline", 200, "offline page");

        let mut worker = worker_at(&temp, mock);
        worker.install().await.unwrap();

        assert_eq!(worker.phase(), WorkerPhase::Waiting);
        assert!(worker.skips_waiting());

        let store = CacheStorage::open_at(temp.path()).store("app-shell-v1");
        assert_eq!(
            store.request_keys().unwrap(),
            vec![
                "GET http://app.test/".to_string(),
                "GET http://app.test/offline".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_install_aborts_on_unreachable_asset() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockFetcher::new());
        mock.respond_text("http://app.test/", 200, "home");
        mock.fail("http://app.test/offline");

        let mut worker = worker_at(&temp, mock);
        let err = worker.install().await.unwrap_err();

        assert!(matches!(err, AuraError::InstallAborted { url } if url == "http://app.test/offline"));
        assert_eq!(worker.phase(), WorkerPhase::Redundant);
        assert!(!worker.skips_waiting());

        // Nothing landed on disk.
        let storage = CacheStorage::open_at(temp.path());
        assert!(storage.store_names().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_aborts_on_error_status() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockFetcher::new());
        mock.respond_text("http://app.test/", 500, "boom");
        mock.respond_text("http://app.test/offline", 200, "offline page");

        let mut worker = worker_at(&temp, mock);
        assert!(worker.install().await.is_err());
        assert_eq!(worker.phase(), WorkerPhase::Redundant);
    }

    #[tokio::test]
    async fn test_activate_purges_superseded_versions() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockFetcher::new());
        mock.respond_text("http://app.test/", 200, "home");
        mock.respond_text("http://app.test/offline", 200, "offline page");

        // An older version is still on disk.
        let storage = CacheStorage::open_at(temp.path());
        storage
            .store("app-shell-v0")
            .put(
                &Request::get(Url::parse("http://app.test/").unwrap()),
                &Response::new(200, "stale"),
            )
            .unwrap();

        let mut worker = worker_at(&temp, mock);
        worker.install().await.unwrap();
        worker.activate().unwrap();

        assert_eq!(worker.phase(), WorkerPhase::Activated);
        assert!(worker.controls_clients());
        assert_eq!(storage.store_names().unwrap(), vec!["app-shell-v1"]);
    }
}
