//! API Module
//!
//! Operational HTTP endpoints for the cache process.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Read-through cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
