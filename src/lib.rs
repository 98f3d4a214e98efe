// Pointer-overlay animator and offline app-shell cache worker.
// The two components are independent: `cursor` animates three follower
// layers behind a pointer; `worker` + `store` + `net` implement the
// stale-while-revalidate offline cache. `app` and `ui` are the terminal
// preview.

pub mod app;
pub mod config;
pub mod cursor;
pub mod error;
pub mod net;
pub mod store;
pub mod ui;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{AuraError, Result};
