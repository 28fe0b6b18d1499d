//! Response models for the operational HTTP endpoints

pub mod responses;

pub use responses::{HealthResponse, StatsResponse};
