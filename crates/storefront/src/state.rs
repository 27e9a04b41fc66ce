//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tower_sessions::Session;

use crate::components::search::SearchSequencer;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::middleware::{SessionTokenStore, visitor_key};
use crate::services::{CartService, CatalogService};
use crate::wix::ClientFactory;

/// Idle time after which a visitor's search sequencer is dropped.
const SEQUENCER_IDLE: Duration = Duration::from_secs(30 * 60);
const SEQUENCER_CAPACITY: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the Wix client factory, services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    factory: ClientFactory,
    catalog: CatalogService,
    sequencers: Cache<String, Arc<SearchSequencer>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let factory = ClientFactory::new(&config.wix, &config.api_base_url);
        let catalog = CatalogService::new(factory.server_client());
        let sequencers = Cache::builder()
            .max_capacity(SEQUENCER_CAPACITY)
            .time_to_idle(SEQUENCER_IDLE)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                factory,
                catalog,
                sequencers,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Wix client factory.
    #[must_use]
    pub fn factory(&self) -> &ClientFactory {
        &self.inner.factory
    }

    /// Catalog reads (API-key client).
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Cart operations for the visitor owning `session`.
    ///
    /// # Errors
    ///
    /// Returns an error when no OAuth client id is configured or the session
    /// store fails.
    pub async fn cart(&self, session: Session) -> Result<CartService, AppError> {
        let key = visitor_key(&session).await?;
        let store = Arc::new(SessionTokenStore::new(session));
        Ok(CartService::new(
            self.inner.factory.visitor_client(&key, store)?,
        ))
    }

    /// Search sequencer of one visitor.
    #[must_use]
    pub fn sequencer(&self, visitor_key: &str) -> Arc<SearchSequencer> {
        self.inner
            .sequencers
            .get_with(visitor_key.to_string(), || Arc::new(SearchSequencer::new()))
    }
}
