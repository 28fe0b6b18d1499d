//! Steam Web API client
//!
//! Thin reqwest bindings for the six calls the cache fronts.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    GameSchema, GlobalAchievementPercentages, OwnedGames, PlayerAchievements, PlayerSummaries,
    Upstream, UpstreamError, VanityUrl,
};

const V1: &str = "v1";
const V2: &str = "v2";

#[derive(Debug, Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SteamClient {
    /// Creates a client for `base_url` (normally `https://api.steampowered.com`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        interface: &str,
        method: &str,
        version: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let endpoint = format!("{}/{}", interface, method);
        if self.api_key.is_empty() {
            return Err(UpstreamError::Rejected(format!(
                "{} not called: no API key configured",
                endpoint
            )));
        }
        let url = format!("{}/{}/{}/{}/", self.base_url, interface, method, version);
        debug!(endpoint = %endpoint, "Calling upstream");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { endpoint, source })
    }
}

#[async_trait]
impl Upstream for SteamClient {
    async fn player_summaries(&self, user_id: &str) -> Result<PlayerSummaries, UpstreamError> {
        self.call("ISteamUser", "GetPlayerSummaries", V2, &[("steamids", user_id.to_string())])
            .await
    }

    async fn owned_games(&self, user_id: &str) -> Result<OwnedGames, UpstreamError> {
        self.call(
            "IPlayerService",
            "GetOwnedGames",
            V1,
            &[
                ("steamid", user_id.to_string()),
                ("include_appinfo", "true".to_string()),
                ("include_played_free_games", "false".to_string()),
                ("include_free_sub", "false".to_string()),
            ],
        )
        .await
    }

    async fn schema_for_game(&self, app_id: u64) -> Result<GameSchema, UpstreamError> {
        self.call("ISteamUserStats", "GetSchemaForGame", V2, &[("appid", app_id.to_string())])
            .await
    }

    async fn global_achievement_percentages(
        &self,
        app_id: u64,
    ) -> Result<GlobalAchievementPercentages, UpstreamError> {
        self.call(
            "ISteamUserStats",
            "GetGlobalAchievementPercentagesForApp",
            V2,
            &[("gameid", app_id.to_string())],
        )
        .await
    }

    async fn player_achievements(
        &self,
        user_id: &str,
        app_id: u64,
    ) -> Result<PlayerAchievements, UpstreamError> {
        self.call(
            "ISteamUserStats",
            "GetPlayerAchievements",
            V1,
            &[("steamid", user_id.to_string()), ("appid", app_id.to_string())],
        )
        .await
    }

    async fn resolve_vanity_url(&self, vanity: &str) -> Result<VanityUrl, UpstreamError> {
        self.call("ISteamUser", "ResolveVanityURL", V1, &[("vanityurl", vanity.to_string())])
            .await
    }
}
