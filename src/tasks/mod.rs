//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside request traffic.
//!
//! # Tasks
//! - Refresher: re-primes cached game schemas and tracked users' game lists

mod refresher;

pub use refresher::{refresh_cycle, spawn_refresher, RefreshReport};
