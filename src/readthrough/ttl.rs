//! TTL tiers, applied at write time by data volatility.

use std::time::Duration;

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// Profile data
pub const PLAYER_SUMMARY: Duration = Duration::from_secs(HOUR);
/// Per-game unlock state, including cached empty results
pub const PLAYER_ACHIEVEMENTS: Duration = Duration::from_secs(HOUR);
pub const PLAYER_GAMES: Duration = Duration::from_secs(DAY);
pub const PLAYER_VANITY: Duration = Duration::from_secs(DAY);
pub const GAME_GLOBAL: Duration = Duration::from_secs(DAY);
pub const GAME_SCHEMA: Duration = Duration::from_secs(7 * DAY);
pub const SESSION: Duration = Duration::from_secs(90 * DAY);
