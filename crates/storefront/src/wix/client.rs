//! Wix REST client.
//!
//! One [`WixClient`] is a cheap handle over shared HTTP state; the
//! per-domain methods live in `products`, `categories`, `inventory` and
//! `cart`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::WixError;
use super::auth::Authorizer;
use super::cache::{CacheKey, CacheValue};

/// Production API host.
pub const DEFAULT_API_BASE_URL: &str = "https://www.wixapis.com";

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the Wix REST APIs.
///
/// Server-side (API key) clients cache product and category lookups for
/// 5 minutes. Visitor clients never cache.
#[derive(Clone)]
pub struct WixClient {
    inner: Arc<WixClientInner>,
}

struct WixClientInner {
    http: reqwest::Client,
    base_url: String,
    auth: Authorizer,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl std::fmt::Debug for WixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WixClient")
            .field("base_url", &self.inner.base_url)
            .field("visitor", &self.inner.auth.is_visitor())
            .finish_non_exhaustive()
    }
}

impl WixClient {
    pub(super) fn new(http: reqwest::Client, base_url: &str, auth: Authorizer) -> Self {
        let cache = (!auth.is_visitor()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build()
        });

        Self {
            inner: Arc::new(WixClientInner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                auth,
                cache,
            }),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether both handles share the same underlying client.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this client authenticates as a visitor.
    #[must_use]
    pub fn is_visitor(&self) -> bool {
        self.inner.auth.is_visitor()
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, WixError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.base_url))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// `GET` a path with query parameters.
    pub(super) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WixError> {
        let url = self.url(path, query)?;
        self.execute(self.inner.http.get(url)).await
    }

    /// `POST` a JSON body to a path.
    pub(super) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, WixError> {
        let url = self.url(path, &[])?;
        self.execute(self.inner.http.post(url).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, WixError> {
        let request = self.inner.auth.authorize(request).await?;
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(WixError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let err = WixError::from_response(status.as_u16(), &body);
            if err.is_not_found() {
                tracing::debug!(status = %status, "Wix resource not found");
            } else {
                tracing::error!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Wix API returned non-success status"
                );
            }
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Wix response"
            );
            WixError::Parse(e)
        })
    }

    pub(super) async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    pub(super) async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// Drop all cached entries.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }
}
