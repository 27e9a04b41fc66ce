//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::components::category_page::{CategoryFastViewState, CategorySlowViewState};
use crate::components::search::ProductSort;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub sort: ProductSort,
    pub cursor: Option<String>,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategorySlowViewState,
    pub listing: CategoryFastViewState,
    pub sorts: &'static [ProductSort],
}

/// Display a category with its first page of products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let (category, listing) = state
        .catalog()
        .category_page(&slug, query.sort)
        .await
        .map_err(|e| AppError::from_wix(e, &format!("category {slug}")))?;

    Ok(CategoryShowTemplate {
        category,
        listing,
        sorts: ProductSort::ALL,
    })
}

/// Next page of product cards (load more / sort change).
#[instrument(skip(state))]
pub async fn more(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<CategoryFastViewState>> {
    let listing = state
        .catalog()
        .category_products(&slug, query.sort, query.cursor.as_deref())
        .await
        .map_err(|e| AppError::from_wix(e, &format!("category {slug}")))?;
    Ok(Json(listing))
}
