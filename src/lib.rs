//! Achievement Cache - a read-through cache in front of the Steam Web API
//!
//! Avoids redundant upstream calls, keeps serving cached data while the
//! upstream is down, and hides where cached data lives behind one contract
//! implemented by memory, file and Redis backends.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod readthrough;
pub mod session;
pub mod shutdown;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::{Cache, CacheBackend};
pub use config::Config;
pub use error::{CacheError, Result};
pub use readthrough::ReadThrough;
pub use session::{Session, SessionStore};
pub use shutdown::{Shutdown, ShutdownTrigger};
pub use tasks::spawn_refresher;
