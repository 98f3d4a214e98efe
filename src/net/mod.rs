// Network module.
// Request/response types, the Fetcher seam, and its implementations.

pub mod client;
pub mod mock;
pub mod types;

pub use client::{Fetcher, HttpFetcher};
pub use mock::MockFetcher;
pub use types::{Method, Request, RequestMode, Response};
