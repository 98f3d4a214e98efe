// Fetch interception.
// Stale-while-revalidate over the versioned store, static-asset caching on
// first fetch, and offline fallback for failed navigations.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::net::{Method, Request, Response};
use crate::store::CacheStore;

use super::lifecycle::ServiceWorker;

/// What the interceptor decided for one request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Outside the worker's remit; the caller talks to the network itself.
    Ignored,
    /// A response was produced, from cache or network.
    Response(Response),
    /// Nothing could be produced; the caller sees a failed fetch and shows
    /// its own failure UI.
    Unresolved,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, FetchOutcome::Ignored)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, FetchOutcome::Unresolved)
    }
}

impl ServiceWorker {
    /// Intercept one request.
    ///
    /// Only GET requests on http(s) URLs are handled; everything else is
    /// ignored and passes through untouched. A cache hit answers without
    /// touching the network and spawns one detached revalidation. A miss
    /// goes to the network, caching static assets on the way back. When the
    /// network fails, navigations fall back to the cached offline route and
    /// anything else stays unresolved.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if request.method != Method::Get || !request.is_http() {
            return FetchOutcome::Ignored;
        }

        let store = self.storage.store(&self.config.cache_name);

        if let Some(cached) = lookup_or_miss(&store, request) {
            self.spawn_revalidation(request.clone()).await;
            return FetchOutcome::Response(cached);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() && self.config.is_static_asset(&request.url) {
                    if let Err(err) = store.put(request, &response) {
                        debug!(url = %request.url, error = %err, "static asset not cached");
                    }
                }
                FetchOutcome::Response(response)
            }
            Err(err) => {
                debug!(url = %request.url, error = %err, "network fetch failed");
                if request.mode.is_navigation() {
                    if let Some(offline) = self.offline_fallback(&store) {
                        return FetchOutcome::Response(offline);
                    }
                }
                FetchOutcome::Unresolved
            }
        }
    }

    /// Refresh a cached entry in the background. The caller that received
    /// the cached response never sees the outcome: a failed or non-success
    /// refresh leaves the entry untouched.
    async fn spawn_revalidation(&self, request: Request) {
        let fetcher = Arc::clone(&self.fetcher);
        let store = self.storage.store(&self.config.cache_name);

        let handle = tokio::spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    if let Err(err) = store.put(&request, &response) {
                        debug!(url = %request.url, error = %err, "revalidated entry not written");
                    }
                }
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "revalidation kept stale entry");
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "background revalidation failed");
                }
            }
        });

        self.revalidations.lock().await.push(handle);
    }

    /// Await every background revalidation spawned so far. The response path
    /// never calls this; it exists for tests and orderly shutdown.
    pub async fn settle(&self) {
        let pending = std::mem::take(&mut *self.revalidations.lock().await);
        for handle in pending {
            let _ = handle.await;
        }
    }

    fn offline_fallback(&self, store: &CacheStore) -> Option<Response> {
        let url = match self.config.resolve(&self.config.offline_route) {
            Ok(url) => url,
            Err(err) => {
                warn!(route = %self.config.offline_route, error = %err, "offline route unresolvable");
                return None;
            }
        };
        lookup_or_miss(store, &Request::get(url))
    }
}

/// Store failures never escape the fetch path; a failed lookup is a miss.
fn lookup_or_miss(store: &CacheStore, request: &Request) -> Option<Response> {
    match store.lookup(request) {
        Ok(found) => found,
        Err(err) => {
            warn!(url = %request.url, error = %err, "cache lookup failed");
            None
        }
    }
}
