//! Shared test fixtures: a counting upstream stub and a backend that fails
//! every operation.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use achievement_cache::cache::CacheBackend;
use achievement_cache::error::{CacheError, Result};
use achievement_cache::upstream::{
    AchievementPercentage, AchievementPercentages, GameSchema, GlobalAchievementPercentages,
    OwnedGame, OwnedGames, OwnedGamesResponse, Player, PlayerAchievement, PlayerAchievements,
    PlayerStats, PlayerSummaries, PlayersResponse, SchemaGame, Upstream, UpstreamError, VanityUrl,
    VanityUrlResponse,
};

/// App ID for which the stub has no achievement data.
pub const UNTRACKED_GAME: u64 = 999;

// == Upstream Stub ==
/// Answers every call with canned data and counts calls per endpoint.
#[derive(Default)]
pub struct StubUpstream {
    pub summaries_calls: AtomicUsize,
    pub owned_games_calls: AtomicUsize,
    pub schema_calls: AtomicUsize,
    pub global_calls: AtomicUsize,
    pub achievements_calls: AtomicUsize,
    pub vanity_calls: AtomicUsize,
    /// When set, every call fails
    down: Mutex<bool>,
    /// App IDs whose schema call fails
    failing_schemas: Mutex<HashSet<u64>>,
    /// App IDs requested from the schema endpoint, in order
    schema_requests: Mutex<Vec<u64>>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        *self.down.lock().unwrap() = down;
    }

    pub fn fail_schema(&self, app_id: u64) {
        self.failing_schemas.lock().unwrap().insert(app_id);
    }

    pub fn schema_requests(&self) -> Vec<u64> {
        self.schema_requests.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn check(&self, endpoint: &str) -> std::result::Result<(), UpstreamError> {
        if *self.down.lock().unwrap() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: 503,
            });
        }
        Ok(())
    }
}

pub fn player(user_id: &str) -> Player {
    Player {
        steamid: user_id.to_string(),
        personaname: format!("persona-{}", user_id),
        ..Player::default()
    }
}

pub fn schema(app_id: u64) -> GameSchema {
    GameSchema {
        game: SchemaGame {
            name: format!("Game {}", app_id),
            version: "1".to_string(),
            ..SchemaGame::default()
        },
    }
}

pub fn owned_games(user_id: &str) -> OwnedGames {
    let games = vec![
        OwnedGame {
            appid: 10,
            name: format!("{} first", user_id),
            playtime_forever: 120,
            ..OwnedGame::default()
        },
        OwnedGame {
            appid: 20,
            name: format!("{} second", user_id),
            ..OwnedGame::default()
        },
    ];
    OwnedGames {
        response: OwnedGamesResponse {
            game_count: games.len() as u64,
            games,
        },
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn player_summaries(
        &self,
        user_id: &str,
    ) -> std::result::Result<PlayerSummaries, UpstreamError> {
        self.summaries_calls.fetch_add(1, Ordering::SeqCst);
        self.check("ISteamUser/GetPlayerSummaries")?;
        Ok(PlayerSummaries {
            response: PlayersResponse {
                players: vec![player(user_id)],
            },
        })
    }

    async fn owned_games(&self, user_id: &str) -> std::result::Result<OwnedGames, UpstreamError> {
        self.owned_games_calls.fetch_add(1, Ordering::SeqCst);
        self.check("IPlayerService/GetOwnedGames")?;
        Ok(owned_games(user_id))
    }

    async fn schema_for_game(&self, app_id: u64) -> std::result::Result<GameSchema, UpstreamError> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.schema_requests.lock().unwrap().push(app_id);
        self.check("ISteamUserStats/GetSchemaForGame")?;
        if self.failing_schemas.lock().unwrap().contains(&app_id) {
            return Err(UpstreamError::Status {
                endpoint: "ISteamUserStats/GetSchemaForGame".to_string(),
                status: 500,
            });
        }
        Ok(schema(app_id))
    }

    async fn global_achievement_percentages(
        &self,
        _app_id: u64,
    ) -> std::result::Result<GlobalAchievementPercentages, UpstreamError> {
        self.global_calls.fetch_add(1, Ordering::SeqCst);
        self.check("ISteamUserStats/GetGlobalAchievementPercentagesForApp")?;
        Ok(GlobalAchievementPercentages {
            achievementpercentages: AchievementPercentages {
                achievements: vec![AchievementPercentage {
                    name: "FIRST_BLOOD".to_string(),
                    percent: 42.5,
                }],
            },
        })
    }

    async fn player_achievements(
        &self,
        user_id: &str,
        app_id: u64,
    ) -> std::result::Result<PlayerAchievements, UpstreamError> {
        self.achievements_calls.fetch_add(1, Ordering::SeqCst);
        self.check("ISteamUserStats/GetPlayerAchievements")?;
        if app_id == UNTRACKED_GAME {
            return Err(UpstreamError::Status {
                endpoint: "ISteamUserStats/GetPlayerAchievements".to_string(),
                status: 400,
            });
        }
        Ok(PlayerAchievements {
            playerstats: PlayerStats {
                steamid: user_id.to_string(),
                gamename: format!("Game {}", app_id),
                achievements: vec![PlayerAchievement {
                    apiname: "FIRST_BLOOD".to_string(),
                    achieved: 1,
                    unlocktime: 1_700_000_000,
                }],
            },
            success: true,
        })
    }

    async fn resolve_vanity_url(
        &self,
        vanity: &str,
    ) -> std::result::Result<VanityUrl, UpstreamError> {
        self.vanity_calls.fetch_add(1, Ordering::SeqCst);
        self.check("ISteamUser/ResolveVanityURL")?;
        Ok(VanityUrl {
            response: VanityUrlResponse {
                steamid: format!("id-for-{}", vanity),
                success: 1,
            },
        })
    }
}

// == Failing Backend ==
/// Backend whose storage is unreachable.
pub struct BrokenBackend;

#[async_trait]
impl CacheBackend for BrokenBackend {
    async fn get(&self, _key: &str) -> Result<Vec<u8>> {
        Err(CacheError::Io("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Err(CacheError::Io("connection refused".to_string()))
    }

    async fn has(&self, _key: &str) -> Result<bool> {
        Err(CacheError::Io("connection refused".to_string()))
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        Err(CacheError::Io("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}
