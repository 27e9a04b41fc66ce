//! Search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::{debug, instrument};

use crate::components::search::{ProductSort, SearchFilters, SearchViewState};
use crate::error::Result;
use crate::filters;
use crate::middleware::visitor_key;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
    /// Comma-separated category slugs.
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Checkbox value (`on`, `true` or `1`).
    pub in_stock: Option<String>,
    pub sort: ProductSort,
    pub cursor: Option<String>,
}

impl SearchQuery {
    fn category_slugs(&self) -> Vec<String> {
        self.category
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    fn in_stock_only(&self) -> bool {
        matches!(self.in_stock.as_deref(), Some("on" | "true" | "1"))
    }

    /// Whether the shopper asked for anything at all.
    fn is_blank(&self) -> bool {
        self.q.trim().is_empty()
            && self.category_slugs().is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && !self.in_stock_only()
    }
}

async fn run(state: &AppState, query: &SearchQuery) -> Result<SearchViewState> {
    let filters = SearchFilters {
        query: query.q.clone(),
        category_ids: state.catalog().category_ids(&query.category_slugs()).await?,
        min_price: query.min_price,
        max_price: query.max_price,
        in_stock_only: query.in_stock_only(),
        sort: query.sort,
    };
    Ok(state
        .catalog()
        .search(&filters, query.cursor.as_deref())
        .await?)
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query: String,
    pub sort: ProductSort,
    pub sorts: &'static [ProductSort],
    pub results: Option<SearchViewState>,
}

/// Display the search page, with results when a query was given.
#[instrument(skip(state))]
pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let results = if query.is_blank() {
        None
    } else {
        Some(run(&state, &query).await?)
    };

    Ok(SearchTemplate {
        query: query.q.trim().to_string(),
        sort: query.sort,
        sorts: ProductSort::ALL,
        results,
    })
}

/// Search as JSON. Answers `{"stale": true}` when a newer search from the
/// same visitor started in the meantime.
#[instrument(skip(state, session))]
pub async fn api(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let key = visitor_key(&session).await?;
    let sequencer = state.sequencer(&key);
    let ticket = sequencer.begin();

    let view = run(&state, &query).await?;
    match sequencer.complete(ticket, view) {
        Some(view) => Ok(Json(serde_json::to_value(view).map_err(crate::wix::WixError::from)?)),
        None => {
            debug!(version = ticket.version(), "Discarding stale search");
            Ok(Json(json!({ "stale": true })))
        }
    }
}
