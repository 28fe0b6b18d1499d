//! Upstream record types
//!
//! Field names follow the provider's JSON so cached entries written by any
//! instance sharing a backend decode the same way.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` as the default value. Go encodes nil slices as `null`, and
/// entries written that way share the backend with ours.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// == Player summaries ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummaries {
    #[serde(default)]
    pub response: PlayersResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayersResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub steamid: String,
    pub communityvisibilitystate: u64,
    pub profilestate: u64,
    pub personaname: String,
    pub profileurl: String,
    pub avatar: String,
    pub avatarmedium: String,
    pub avatarfull: String,
    pub lastlogoff: u64,
    pub personastate: u64,
    pub timecreated: u64,
    pub loccountrycode: String,
}

// == Owned games ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnedGames {
    #[serde(default)]
    pub response: OwnedGamesResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnedGamesResponse {
    pub game_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub games: Vec<OwnedGame>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnedGame {
    pub appid: u64,
    pub name: String,
    pub img_icon_url: String,
    /// Minutes
    pub playtime_forever: u64,
    pub rtime_last_played: u64,
}

// == Game schema ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSchema {
    #[serde(default)]
    pub game: SchemaGame,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaGame {
    #[serde(rename = "gameName")]
    pub name: String,
    #[serde(rename = "gameVersion")]
    pub version: String,
    #[serde(rename = "availableGameStats")]
    pub available_game_stats: GameStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    #[serde(default, deserialize_with = "nullable")]
    pub achievements: Vec<GameAchievement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameAchievement {
    pub name: String,
    pub defaultvalue: u64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub hidden: u64,
    pub description: String,
    pub icon: String,
    pub icongray: String,
}

// == Global achievement percentages ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalAchievementPercentages {
    #[serde(default)]
    pub achievementpercentages: AchievementPercentages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementPercentages {
    #[serde(default, deserialize_with = "nullable")]
    pub achievements: Vec<AchievementPercentage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementPercentage {
    pub name: String,
    pub percent: f64,
}

// == Player achievements ==
/// The `Default` value doubles as the cached "no achievement data" result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAchievements {
    pub playerstats: PlayerStats,
    pub success: bool,
}

impl PlayerAchievements {
    pub fn is_empty(&self) -> bool {
        self.playerstats.achievements.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub steamid: String,
    pub gamename: String,
    #[serde(default, deserialize_with = "nullable")]
    pub achievements: Vec<PlayerAchievement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAchievement {
    pub apiname: String,
    pub achieved: u64,
    pub unlocktime: u64,
}

// == Vanity URL ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VanityUrl {
    #[serde(default)]
    pub response: VanityUrlResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VanityUrlResponse {
    pub steamid: String,
    pub success: u64,
}
