// Scripted fetcher for tests and offline demo runs.
// Per-URL responses or simulated transport failures, with call counting so
// tests can assert exactly how often the network was touched.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AuraError, Result};

use super::client::Fetcher;
use super::types::{Request, Response};

#[derive(Debug, Clone)]
enum Script {
    Respond(Response),
    Fail,
}

/// A `Fetcher` that answers from a script instead of the network.
///
/// Routes are keyed by full URL. Unscripted URLs fail like a dead network,
/// which is usually what a test wants to notice.
#[derive(Default)]
pub struct MockFetcher {
    scripts: Mutex<HashMap<String, Script>>,
    fetches: AtomicUsize,
    per_url: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a URL.
    pub fn respond(&self, url: &str, response: Response) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), Script::Respond(response));
    }

    /// Script a plain-text response for a URL.
    pub fn respond_text(&self, url: &str, status: u16, body: &str) {
        self.respond(url, Response::new(status, body));
    }

    /// Script a transport failure for a URL.
    pub fn fail(&self, url: &str) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), Script::Fail);
    }

    /// Total number of fetch calls observed.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of fetch calls observed for one URL.
    pub fn fetches_for(&self, url: &str) -> usize {
        self.per_url.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self
            .per_url
            .lock()
            .unwrap()
            .entry(request.url.to_string())
            .or_insert(0) += 1;

        let script = self.scripts.lock().unwrap().get(request.url.as_str()).cloned();
        match script {
            Some(Script::Respond(response)) => Ok(response),
            Some(Script::Fail) => Err(AuraError::Other(format!(
                "mock: scripted failure for {}",
                request.url
            ))),
            None => Err(AuraError::Other(format!(
                "mock: no route for {}",
                request.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[tokio::test]
    async fn test_scripted_response_and_counts() {
        let mock = MockFetcher::new();
        mock.respond_text("http://app.test/", 200, "home");

        let request = Request::get(Url::parse("http://app.test/").unwrap());
        let response = mock.fetch(&request).await.unwrap();
        assert_eq!(response.text(), "home");

        let missing = Request::get(Url::parse("http://app.test/nope").unwrap());
        assert!(mock.fetch(&missing).await.is_err());

        assert_eq!(mock.fetch_count(), 2);
        assert_eq!(mock.fetches_for("http://app.test/"), 1);
        assert_eq!(mock.fetches_for("http://app.test/nope"), 1);
    }
}
