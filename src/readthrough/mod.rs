//! Read-Through Cache Helper
//!
//! Every upstream query goes through the same steps: build the namespaced
//! key, try the backend, and on a miss call upstream and write the result
//! back with the TTL tier for that data. A hit is returned as-is however old
//! it is; staleness is bounded only by the TTL.

pub mod keys;
mod stats;
pub mod ttl;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::config::BackendErrorPolicy;
use crate::error::{CacheError, Result};
use crate::upstream::{
    GameSchema, GlobalAchievementPercentages, OwnedGames, PlayerAchievements, PlayerSummaries,
    Upstream, UpstreamError, VanityUrl,
};

pub use stats::{CacheStats, ReadThroughStats};

/// Composes a [`Cache`] with an [`Upstream`] client.
pub struct ReadThrough {
    cache: Cache,
    upstream: Arc<dyn Upstream>,
    policy: BackendErrorPolicy,
    stats: ReadThroughStats,
}

impl ReadThrough {
    /// Creates a helper using the default [`BackendErrorPolicy::FallThrough`].
    pub fn new(cache: Cache, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            cache,
            upstream,
            policy: BackendErrorPolicy::default(),
            stats: ReadThroughStats::new(),
        }
    }

    pub fn with_policy(mut self, policy: BackendErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Entity queries ==

    pub async fn get_player_summaries(&self, user_id: &str) -> Result<PlayerSummaries> {
        let key = keys::player_summary(user_id);
        self.read_through(&key, ttl::PLAYER_SUMMARY, self.upstream.player_summaries(user_id))
            .await
    }

    pub async fn get_player_owned_games(&self, user_id: &str) -> Result<OwnedGames> {
        let key = keys::player_games(user_id);
        self.read_through(&key, ttl::PLAYER_GAMES, self.upstream.owned_games(user_id))
            .await
    }

    pub async fn get_schema_for_game(&self, app_id: u64) -> Result<GameSchema> {
        let key = keys::game_schema(app_id);
        self.read_through(&key, ttl::GAME_SCHEMA, self.upstream.schema_for_game(app_id))
            .await
    }

    pub async fn get_global_achievement_percentages(
        &self,
        app_id: u64,
    ) -> Result<GlobalAchievementPercentages> {
        let key = keys::game_global(app_id);
        self.read_through(
            &key,
            ttl::GAME_GLOBAL,
            self.upstream.global_achievement_percentages(app_id),
        )
        .await
    }

    /// Never fails because of upstream: a game without achievement tracking
    /// makes upstream error, and that is cached as an empty result so the
    /// call is not repeated until the TTL runs out.
    pub async fn get_player_achievements(
        &self,
        user_id: &str,
        app_id: u64,
    ) -> Result<PlayerAchievements> {
        let key = keys::player_achievements(user_id, app_id);
        if let Some(hit) = self.lookup(&key).await? {
            return Ok(hit);
        }

        self.stats.record_upstream_call();
        let value = match self.upstream.player_achievements(user_id, app_id).await {
            Ok(value) => value,
            Err(e) => {
                self.stats.record_upstream_failure();
                self.stats.record_negative_cached();
                warn!(
                    user_id = %user_id,
                    app_id,
                    error = %e,
                    "No player achievements from upstream, caching empty result"
                );
                PlayerAchievements::default()
            }
        };

        self.store(&key, &value, ttl::PLAYER_ACHIEVEMENTS).await?;
        Ok(value)
    }

    pub async fn resolve_vanity_url(&self, vanity: &str) -> Result<VanityUrl> {
        let key = keys::player_vanity(vanity);
        self.read_through(&key, ttl::PLAYER_VANITY, self.upstream.resolve_vanity_url(vanity))
            .await
    }

    // == Catalog maintenance ==

    /// App IDs of every game schema currently cached. Keys that do not
    /// carry a numeric ID are skipped.
    pub async fn schemas_in_cache(&self) -> Result<Vec<u64>> {
        let keys = self.cache.keys(keys::GAME_SCHEMA_PATTERN).await?;

        let mut ids: Vec<u64> = keys
            .iter()
            .filter_map(|key| {
                let id = keys::parse_game_schema(key);
                if id.is_none() {
                    warn!(key = %key, "Skipping schema key without a numeric app ID");
                }
                id
            })
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Fetches the schema from upstream unconditionally and rewrites the
    /// entry, restarting its TTL.
    pub async fn refresh_schema(&self, app_id: u64) -> Result<GameSchema> {
        let key = keys::game_schema(app_id);
        self.fetch_and_store(&key, ttl::GAME_SCHEMA, self.upstream.schema_for_game(app_id))
            .await
    }

    /// Fetches the owned-games list from upstream unconditionally.
    pub async fn refresh_owned_games(&self, user_id: &str) -> Result<OwnedGames> {
        let key = keys::player_games(user_id);
        self.fetch_and_store(&key, ttl::PLAYER_GAMES, self.upstream.owned_games(user_id))
            .await
    }

    // == Internals ==

    async fn read_through<T, Fut>(&self, key: &str, ttl: Duration, fetch: Fut) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        Fut: Future<Output = std::result::Result<T, UpstreamError>> + Send,
    {
        if let Some(hit) = self.lookup(key).await? {
            return Ok(hit);
        }
        self.fetch_and_store(key, ttl, fetch).await
    }

    /// `Ok(None)` on a miss, and on a backend failure under `FallThrough`.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.cache.get::<T>(key).await {
            Ok(value) => {
                self.stats.record_hit();
                debug!(key = %key, "Cache hit");
                Ok(Some(value))
            }
            Err(CacheError::NotFound(_)) => {
                self.stats.record_miss();
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(CacheError::Io(msg)) => {
                self.stats.record_backend_error();
                match self.policy {
                    BackendErrorPolicy::FallThrough => {
                        warn!(
                            key = %key,
                            error = %msg,
                            "Cache read failed, falling through to upstream"
                        );
                        self.stats.record_miss();
                        Ok(None)
                    }
                    BackendErrorPolicy::Propagate => Err(CacheError::Io(msg)),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_and_store<T, Fut>(&self, key: &str, ttl: Duration, fetch: Fut) -> Result<T>
    where
        T: Serialize + Send + Sync,
        Fut: Future<Output = std::result::Result<T, UpstreamError>> + Send,
    {
        self.stats.record_upstream_call();
        let value = fetch.await.map_err(|e| {
            self.stats.record_upstream_failure();
            e
        })?;

        self.store(key, &value, ttl).await?;
        Ok(value)
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        match self.cache.set(key, value, ttl).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached upstream result");
                Ok(())
            }
            Err(CacheError::Io(msg)) if self.policy == BackendErrorPolicy::FallThrough => {
                self.stats.record_backend_error();
                warn!(key = %key, error = %msg, "Cache write failed, returning uncached result");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
