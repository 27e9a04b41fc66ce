//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session holds the
//! visitor's OAuth tokens and a stable visitor key.

use async_trait::async_trait;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::wix::{TokenStore, VisitorTokens, WixError};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "wix_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session keys.
pub mod keys {
    /// Visitor OAuth tokens.
    pub const VISITOR_TOKENS: &str = "wix_visitor_tokens";

    /// Stable per-visitor key (search sequencing).
    pub const VISITOR_KEY: &str = "visitor_key";
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Stable key of this visitor, created on first use.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn visitor_key(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(key) = session.get::<String>(keys::VISITOR_KEY).await? {
        return Ok(key);
    }
    let key = Uuid::new_v4().to_string();
    session.insert(keys::VISITOR_KEY, &key).await?;
    Ok(key)
}

/// Visitor tokens kept in the tower-sessions session.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

fn session_error(e: &tower_sessions::session::Error) -> WixError {
    WixError::Auth(format!("session store: {e}"))
}

#[async_trait]
impl TokenStore for SessionTokenStore {
    async fn load(&self) -> Result<Option<VisitorTokens>, WixError> {
        self.session
            .get::<VisitorTokens>(keys::VISITOR_TOKENS)
            .await
            .map_err(|e| session_error(&e))
    }

    async fn save(&self, tokens: &VisitorTokens) -> Result<(), WixError> {
        self.session
            .insert(keys::VISITOR_TOKENS, tokens)
            .await
            .map_err(|e| session_error(&e))
    }

    async fn clear(&self) -> Result<(), WixError> {
        self.session
            .remove::<VisitorTokens>(keys::VISITOR_TOKENS)
            .await
            .map(|_| ())
            .map_err(|e| session_error(&e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_session_token_store_round_trip() {
        let store = SessionTokenStore::new(session());
        assert!(store.load().await.unwrap().is_none());

        let tokens = VisitorTokens::new("a", "r", Utc::now() + Duration::hours(4));
        store.save(&tokens).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visitor_key_is_stable() {
        let session = session();
        let first = visitor_key(&session).await.unwrap();
        let second = visitor_key(&session).await.unwrap();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
