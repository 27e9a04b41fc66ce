//! Authentication strategies.
//!
//! - API key: static `Authorization` + `wix-site-id` headers.
//! - Visitor: anonymous OAuth tokens, refreshed shortly before expiry and
//!   persisted through a [`TokenStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use super::WixError;

/// Tokens expiring within this many seconds are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

const OAUTH_TOKEN_PATH: &str = "/oauth2/token";

// =============================================================================
// API key
// =============================================================================

/// Server-side API key credentials.
#[derive(Clone)]
pub struct ApiKeyCredentials {
    pub api_key: SecretString,
    pub site_id: String,
}

impl std::fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("api_key", &"[REDACTED]")
            .field("site_id", &self.site_id)
            .finish()
    }
}

// =============================================================================
// Visitor tokens
// =============================================================================

/// OAuth tokens of one anonymous visitor.
///
/// Implements `Debug` manually to redact the tokens.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "StoredTokens", into = "StoredTokens")]
pub struct VisitorTokens {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl VisitorTokens {
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let access_token: String = access_token.into();
        let refresh_token: String = refresh_token.into();
        Self {
            access_token: SecretString::from(access_token),
            refresh_token: SecretString::from(refresh_token),
            expires_at,
        }
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        self.expires_at - now <= Duration::seconds(margin_secs)
    }
}

impl PartialEq for VisitorTokens {
    fn eq(&self, other: &Self) -> bool {
        self.access_token.expose_secret() == other.access_token.expose_secret()
            && self.refresh_token.expose_secret() == other.refresh_token.expose_secret()
            && self.expires_at == other.expires_at
    }
}

impl Eq for VisitorTokens {}

impl std::fmt::Debug for VisitorTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Session representation of [`VisitorTokens`].
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<StoredTokens> for VisitorTokens {
    fn from(stored: StoredTokens) -> Self {
        Self::new(stored.access_token, stored.refresh_token, stored.expires_at)
    }
}

impl From<VisitorTokens> for StoredTokens {
    fn from(tokens: VisitorTokens) -> Self {
        Self {
            access_token: tokens.access_token.expose_secret().to_string(),
            refresh_token: tokens.refresh_token.expose_secret().to_string(),
            expires_at: tokens.expires_at,
        }
    }
}

/// Where visitor tokens live between requests.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Tokens saved for this visitor, if any.
    async fn load(&self) -> Result<Option<VisitorTokens>, WixError>;
    /// Persist tokens for this visitor.
    async fn save(&self, tokens: &VisitorTokens) -> Result<(), WixError>;
    /// Forget this visitor's tokens.
    async fn clear(&self) -> Result<(), WixError>;
}

/// In-process token store for a single visitor (CLI, tests).
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<VisitorTokens>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with tokens.
    #[must_use]
    pub fn with_tokens(tokens: VisitorTokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<VisitorTokens>, WixError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &VisitorTokens) -> Result<(), WixError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), WixError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

// =============================================================================
// OAuth
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    grant_type: &'static str,
    #[serde(rename = "refresh_token", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "accessToken")]
    access_token: String,
    #[serde(alias = "refreshToken")]
    refresh_token: String,
    #[serde(alias = "expiresIn")]
    expires_in: i64,
}

/// Client for the Wix OAuth token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
}

impl OAuthClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, client_id: impl Into<String>) -> Self {
        Self {
            http,
            token_url: format!("{}{OAUTH_TOKEN_PATH}", base_url.trim_end_matches('/')),
            client_id: client_id.into(),
        }
    }

    /// Issue tokens for a new anonymous visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint rejects the request.
    #[instrument(skip(self))]
    pub async fn anonymous(&self) -> Result<VisitorTokens, WixError> {
        self.request(TokenRequest {
            client_id: &self.client_id,
            grant_type: "anonymous",
            refresh_token: None,
        })
        .await
    }

    /// Exchange a refresh token for new tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is rejected.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<VisitorTokens, WixError> {
        self.request(TokenRequest {
            client_id: &self.client_id,
            grant_type: "refresh_token",
            refresh_token: Some(refresh_token),
        })
        .await
    }

    async fn request(&self, body: TokenRequest<'_>) -> Result<VisitorTokens, WixError> {
        let response = self.http.post(&self.token_url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = WixError::from_response(status.as_u16(), &text);
            return Err(WixError::Auth(format!("token request failed: {err}")));
        }

        let token: TokenResponse = serde_json::from_str(&text)?;
        let expires_at = Duration::try_seconds(token.expires_in)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                WixError::Auth(format!("token expiry out of range: {}", token.expires_in))
            })?;
        Ok(VisitorTokens::new(
            token.access_token,
            token.refresh_token,
            expires_at,
        ))
    }
}

// =============================================================================
// Authorizer
// =============================================================================

/// Latest tokens of one visitor, shared by all of that visitor's clients.
///
/// Holding the lock serializes token issue and refresh for the visitor.
pub(super) type VisitorSlot = Arc<Mutex<Option<VisitorTokens>>>;

/// Visitor strategy: OAuth client, the visitor's token store and shared slot.
pub(super) struct VisitorAuth {
    oauth: OAuthClient,
    store: Arc<dyn TokenStore>,
    slot: VisitorSlot,
}

impl VisitorAuth {
    pub(super) fn new(oauth: OAuthClient, store: Arc<dyn TokenStore>, slot: VisitorSlot) -> Self {
        Self { oauth, store, slot }
    }

    /// A valid access token, refreshing or re-issuing as needed.
    async fn access_token(&self) -> Result<SecretString, WixError> {
        let mut shared = self.slot.lock().await;

        let stored = self.store.load().await?;
        let latest = [stored.clone(), shared.clone()]
            .into_iter()
            .flatten()
            .max_by_key(|tokens| tokens.expires_at);

        let tokens = match latest {
            Some(tokens) if !tokens.expires_within(Utc::now(), REFRESH_MARGIN_SECS) => tokens,
            Some(tokens) => match self.oauth.refresh(tokens.refresh_token.expose_secret()).await {
                Ok(fresh) => {
                    debug!("Refreshed visitor token");
                    fresh
                }
                Err(e) => {
                    warn!(error = %e, "Visitor token refresh failed, issuing a new one");
                    self.oauth.anonymous().await?
                }
            },
            None => {
                debug!("Issuing anonymous visitor token");
                self.oauth.anonymous().await?
            }
        };

        if stored.as_ref() != Some(&tokens) {
            self.store.save(&tokens).await?;
        }
        let access_token = tokens.access_token.clone();
        *shared = Some(tokens);
        Ok(access_token)
    }
}

/// How a client authenticates its requests.
pub(super) enum Authorizer {
    ApiKey(ApiKeyCredentials),
    Visitor(VisitorAuth),
}

impl Authorizer {
    /// Attach authentication headers to a request.
    pub(super) async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, WixError> {
        match self {
            Self::ApiKey(creds) => Ok(request
                .header("Authorization", creds.api_key.expose_secret())
                .header("wix-site-id", &creds.site_id)),
            Self::Visitor(visitor) => {
                let token = visitor.access_token().await?;
                Ok(request.header("Authorization", token.expose_secret()))
            }
        }
    }

    pub(super) const fn is_visitor(&self) -> bool {
        matches!(self, Self::Visitor(_))
    }
}
