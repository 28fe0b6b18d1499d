//! Cache key namespace
//!
//! These layouts are shared with every other instance pointed at the same
//! backend and must not change.

pub fn player_summary(user_id: &str) -> String {
    format!("player:{}:summary", user_id)
}

pub fn player_games(user_id: &str) -> String {
    format!("player:{}:games", user_id)
}

pub fn player_achievements(user_id: &str, app_id: u64) -> String {
    format!("player:{}:game:{}:achievements", user_id, app_id)
}

pub fn player_vanity(vanity: &str) -> String {
    format!("player:{}:vanity", vanity)
}

pub fn game_schema(app_id: u64) -> String {
    format!("game:{}:schema", app_id)
}

pub fn game_global(app_id: u64) -> String {
    format!("game:{}:global", app_id)
}

pub fn session(token: &str) -> String {
    format!("session:{}", token)
}

/// Matches every cached game schema.
pub const GAME_SCHEMA_PATTERN: &str = "game:*:schema";

/// Extracts the app ID from a `game:<id>:schema` key.
pub fn parse_game_schema(key: &str) -> Option<u64> {
    key.strip_prefix("game:")?
        .strip_suffix(":schema")?
        .parse()
        .ok()
}
