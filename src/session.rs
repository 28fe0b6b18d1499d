//! Session Store
//!
//! Authentication sessions kept in the cache under `session:<token>`.
//! There is no upstream behind it: a miss simply means "no session".

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::Cache;
use crate::error::Result;
use crate::readthrough::{keys, ttl};

/// The authenticated identity bound to a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "SteamID")]
    pub subject_id: String,
}

impl Session {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    cache: Cache,
}

impl SessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Starts a session for `subject_id` and returns its new random token.
    pub async fn create(&self, subject_id: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        self.set(&token, &Session::new(subject_id)).await?;
        debug!(subject_id = %subject_id, "Session created");
        Ok(token)
    }

    /// Stores `session` under `token` for the session TTL.
    pub async fn set(&self, token: &str, session: &Session) -> Result<()> {
        self.cache.set(&keys::session(token), session, ttl::SESSION).await
    }

    /// Looks up a session. Absence, including expiry between the existence
    /// check and the read, is `Ok(None)`.
    pub async fn get(&self, token: &str) -> Result<Option<Session>> {
        let key = keys::session(token);
        if !self.cache.has(&key).await? {
            return Ok(None);
        }

        match self.cache.get::<Session>(&key).await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;
    use crate::shutdown::Shutdown;
    use std::time::Duration;

    fn store() -> SessionStore {
        SessionStore::new(Cache::new(MemoryBackend::new(Shutdown::never())))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let sessions = store();
        let token = sessions.create("76561197970932835").await.unwrap();

        let session = sessions.get(&token).await.unwrap();
        assert_eq!(session, Some(Session::new("76561197970932835")));
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let sessions = store();
        let a = sessions.create("U").await.unwrap();
        let b = sessions.create("U").await.unwrap();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_token_is_no_session() {
        let sessions = store();
        assert_eq!(sessions.get("not-a-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stored_under_session_namespace() {
        let cache = Cache::new(MemoryBackend::new(Shutdown::never()));
        let sessions = SessionStore::new(cache.clone());
        sessions.set("abc", &Session::new("U")).await.unwrap();

        assert!(cache.has("session:abc").await.unwrap());
        assert_eq!(cache.keys("session:*").await.unwrap(), vec!["session:abc"]);
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let cache = Cache::new(MemoryBackend::new(Shutdown::never()));
        cache
            .set("session:short", &Session::new("U"), Duration::from_millis(50))
            .await
            .unwrap();
        let sessions = SessionStore::new(cache);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sessions.get("short").await.unwrap(), None);
    }

    #[test]
    fn test_session_json_field_name() {
        let json = serde_json::to_string(&Session::new("U")).unwrap();
        assert_eq!(json, r#"{"SteamID":"U"}"#);
    }
}
