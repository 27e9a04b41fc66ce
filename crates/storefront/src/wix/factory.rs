//! Authenticated client construction.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use moka::sync::Cache;
use tokio::sync::Mutex;

use super::WixError;
use super::auth::{Authorizer, OAuthClient, TokenStore, VisitorAuth, VisitorSlot};
use super::client::WixClient;
use crate::config::WixConfig;

/// Idle time after which a visitor's shared token slot is dropped.
const VISITOR_SLOT_IDLE: Duration = Duration::from_secs(30 * 60);
const VISITOR_SLOT_CAPACITY: u64 = 10_000;

/// Builds authenticated [`WixClient`]s from one configuration.
///
/// The API-key client is created once and shared. Visitor clients are
/// built per request around that visitor's token store; clients of the same
/// visitor share one token slot, so concurrent requests issue or refresh a
/// token only once.
pub struct ClientFactory {
    http: reqwest::Client,
    base_url: String,
    config: WixConfig,
    server: OnceLock<WixClient>,
    visitor_slots: Cache<String, VisitorSlot>,
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("server_initialized", &self.server.get().is_some())
            .field("visitors", &self.visitor_slots.entry_count())
            .finish()
    }
}

impl ClientFactory {
    #[must_use]
    pub fn new(config: &WixConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
            server: OnceLock::new(),
            visitor_slots: Cache::builder()
                .max_capacity(VISITOR_SLOT_CAPACITY)
                .time_to_idle(VISITOR_SLOT_IDLE)
                .build(),
        }
    }

    /// The shared API-key client.
    #[must_use]
    pub fn server_client(&self) -> WixClient {
        self.server
            .get_or_init(|| {
                WixClient::new(
                    self.http.clone(),
                    &self.base_url,
                    Authorizer::ApiKey(self.config.api_key.clone()),
                )
            })
            .clone()
    }

    /// OAuth client for visitor tokens.
    ///
    /// # Errors
    ///
    /// Returns an auth error when no OAuth client id is configured.
    pub fn oauth_client(&self) -> Result<OAuthClient, WixError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| WixError::Auth("no OAuth client id configured".to_string()))?;
        Ok(OAuthClient::new(self.http.clone(), &self.base_url, client_id))
    }

    /// A client authenticating as the visitor `visitor_key`, whose tokens
    /// live in `store`.
    ///
    /// # Errors
    ///
    /// Returns an auth error when no OAuth client id is configured.
    pub fn visitor_client(
        &self,
        visitor_key: &str,
        store: Arc<dyn TokenStore>,
    ) -> Result<WixClient, WixError> {
        let oauth = self.oauth_client()?;
        let slot = self
            .visitor_slots
            .get_with(visitor_key.to_string(), || Arc::new(Mutex::new(None)));
        Ok(WixClient::new(
            self.http.clone(),
            &self.base_url,
            Authorizer::Visitor(VisitorAuth::new(oauth, store, slot)),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::wix::{ApiKeyCredentials, MemoryTokenStore};
    use secrecy::SecretString;

    fn config(client_id: Option<&str>) -> WixConfig {
        WixConfig {
            api_key: ApiKeyCredentials {
                api_key: SecretString::from("key"),
                site_id: "site".to_string(),
            },
            client_id: client_id.map(str::to_string),
        }
    }

    #[test]
    fn test_server_client_is_memoized() {
        let factory = ClientFactory::new(&config(None), "http://localhost:1/");
        let a = factory.server_client();
        let b = factory.server_client();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.base_url(), "http://localhost:1");
        assert!(!a.is_visitor());
    }

    #[test]
    fn test_visitor_client_requires_client_id() {
        let factory = ClientFactory::new(&config(None), "http://localhost:1");
        let err = factory
            .visitor_client("visitor", Arc::new(MemoryTokenStore::new()))
            .unwrap_err();
        assert!(matches!(err, WixError::Auth(_)));

        let factory = ClientFactory::new(&config(Some("client")), "http://localhost:1");
        let client = factory
            .visitor_client("visitor", Arc::new(MemoryTokenStore::new()))
            .unwrap();
        assert!(client.is_visitor());
    }

    #[test]
    fn test_visitor_slot_is_per_visitor() {
        let factory = ClientFactory::new(&config(Some("client")), "http://localhost:1");
        let a = factory.visitor_slots.get_with("a".to_string(), || Arc::new(Mutex::new(None)));
        factory
            .visitor_client("a", Arc::new(MemoryTokenStore::new()))
            .unwrap();
        factory
            .visitor_client("b", Arc::new(MemoryTokenStore::new()))
            .unwrap();

        assert!(Arc::ptr_eq(&a, &factory.visitor_slots.get("a").unwrap()));
        assert!(!Arc::ptr_eq(&a, &factory.visitor_slots.get("b").unwrap()));
    }
}
