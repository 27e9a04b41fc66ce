//! Product route handlers.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wix_headless_core::{ChoiceId, ModifierId, OptionId};

use crate::components::cart::CartIndicatorViewState;
use crate::components::product_page::{
    ProductPage, ProductPageError, ProductPageFastViewState, ProductPageSlowViewState,
};
use crate::components::variants::Selection;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Shopper interaction with a product page.
///
/// The page is stateless: every request carries the full selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductInteraction {
    /// Current selection, option ID to choice ID.
    pub selection: Selection,
    /// Option being changed.
    pub option_id: Option<OptionId>,
    /// New choice for `option_id`.
    pub choice_id: Option<ChoiceId>,
    pub quantity: Option<u32>,
    /// Free-text modifier values.
    pub modifiers: BTreeMap<ModifierId, String>,
}

impl ProductInteraction {
    fn apply(self, page: &mut ProductPage) -> std::result::Result<(), ProductPageError> {
        page.set_selection(self.selection);
        if let (Some(option), Some(choice)) = (self.option_id, self.choice_id) {
            page.select_choice(option, choice)?;
        }
        if let Some(quantity) = self.quantity {
            page.set_quantity(quantity);
        }
        for (id, text) in self.modifiers {
            page.set_modifier_text(id, text);
        }
        Ok(())
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductPageSlowViewState,
    pub fast: ProductPageFastViewState,
}

async fn load(state: &AppState, slug: &str) -> Result<ProductPage> {
    state
        .catalog()
        .product_page(slug)
        .await
        .map_err(|e| AppError::from_wix(e, &format!("product {slug}")))
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<impl IntoResponse> {
    let page = load(&state, &slug).await?;
    Ok(ProductShowTemplate {
        product: page.slow(),
        fast: page.fast(),
    })
}

/// Apply a selection and return the fast view state.
#[instrument(skip(state, interaction))]
pub async fn select(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(interaction): Json<ProductInteraction>,
) -> Result<Json<ProductPageFastViewState>> {
    let mut page = load(&state, &slug).await?;
    interaction.apply(&mut page)?;
    Ok(Json(page.fast()))
}

/// Add the resolved variant to the visitor's cart.
#[instrument(skip(state, session, interaction))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Json(interaction): Json<ProductInteraction>,
) -> Result<Json<CartIndicatorViewState>> {
    let mut page = load(&state, &slug).await?;
    interaction.apply(&mut page)?;
    let line = page.add_to_cart_request()?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", page.product().id.as_str())]),
    );
    let indicator = state.cart(session).await?.add(line).await?;
    Ok(Json(indicator))
}
