// Offline cache worker module.
// Lifecycle (install/activate) and fetch interception.

pub mod fetch;
pub mod lifecycle;

pub use fetch::FetchOutcome;
pub use lifecycle::{ServiceWorker, WorkerPhase};
