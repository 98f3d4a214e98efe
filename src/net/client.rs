// HTTP fetch seam.
// The Fetcher trait is the worker's only view of the network; HttpFetcher is
// the reqwest-backed implementation used in production.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::{AuraError, Result};

use super::types::{Method, Request, Response};

const AURA_USER_AGENT: &str = "aura-worker";

/// Capability to fetch a resource over the network.
///
/// Implementations must be shareable across tasks; the worker clones an
/// `Arc<dyn Fetcher>` into every background revalidation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// reqwest-backed fetcher with default headers installed at construction.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(AURA_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(AuraError::Fetch)?;

        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let response = self
            .client
            .request(to_reqwest(request.method), request.url.clone())
            .send()
            .await
            .map_err(AuraError::Fetch)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(AuraError::Fetch)?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
