//! Cart route handlers.
//!
//! The cart belongs to the visitor's Wix OAuth identity, whose tokens live in
//! the session; there is no cart ID to keep.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wix_headless_core::LineItemId;

use crate::components::cart::{CartIndicatorViewState, CartState};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Quantity change.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub line_item_id: LineItemId,
    pub quantity: u32,
}

/// Line removal.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub line_item_id: LineItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartState,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = state.cart(session).await?.state().await?;
    Ok(CartShowTemplate { cart })
}

/// Cart badge.
#[instrument(skip(state, session))]
pub async fn indicator(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartIndicatorViewState>> {
    Ok(Json(state.cart(session).await?.indicator().await?))
}

/// Change a line quantity; zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartState>> {
    let cart = state
        .cart(session)
        .await?
        .update_quantity(request.line_item_id, request.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartState>> {
    let cart = state
        .cart(session)
        .await?
        .remove(&[request.line_item_id])
        .await?;
    Ok(Json(cart))
}
