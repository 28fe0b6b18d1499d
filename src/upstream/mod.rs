//! Upstream Module
//!
//! The rate-limited data provider sitting behind the cache. The cache only
//! cares whether a call succeeded; transport details stay in here.

mod models;
mod steam;

use async_trait::async_trait;
use thiserror::Error;

pub use models::*;
pub use steam::SteamClient;

/// Failure reported by an upstream call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Request could not be sent or the response body could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Response body did not match the expected shape
    #[error("unable to parse {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Call refused without reaching the provider
    #[error("{0}")]
    Rejected(String),
}

/// One call per entity type the cache fronts.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn player_summaries(&self, user_id: &str) -> Result<PlayerSummaries, UpstreamError>;

    async fn owned_games(&self, user_id: &str) -> Result<OwnedGames, UpstreamError>;

    async fn schema_for_game(&self, app_id: u64) -> Result<GameSchema, UpstreamError>;

    async fn global_achievement_percentages(
        &self,
        app_id: u64,
    ) -> Result<GlobalAchievementPercentages, UpstreamError>;

    /// Fails for games without achievement tracking; callers expect that.
    async fn player_achievements(
        &self,
        user_id: &str,
        app_id: u64,
    ) -> Result<PlayerAchievements, UpstreamError>;

    async fn resolve_vanity_url(&self, vanity: &str) -> Result<VanityUrl, UpstreamError>;
}
