//! eCommerce current-cart methods.
//!
//! The "current cart" belongs to whoever the client authenticates as, so
//! these are meant for visitor clients.

use serde::Serialize;
use tracing::{debug, instrument};
use wix_headless_core::LineItemId;

use super::WixError;
use super::client::WixClient;
use super::types::{AddLineItem, Cart, CartResponse, LineItemQuantityUpdate};

const CURRENT_CART: &str = "/ecom/v1/carts/current";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody<'a> {
    line_items: &'a [AddLineItem],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuantityBody<'a> {
    line_items: &'a [LineItemQuantityUpdate],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveLineItemsBody<'a> {
    line_item_ids: &'a [LineItemId],
}

fn into_cart(response: CartResponse) -> Result<Cart, WixError> {
    response
        .cart
        .ok_or_else(|| WixError::NotFound("Cart missing from response".to_string()))
}

impl WixClient {
    /// The visitor's current cart, or `None` when they have none yet.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "cart not found".
    #[instrument(skip(self))]
    pub async fn current_cart(&self) -> Result<Option<Cart>, WixError> {
        match self.get::<CartResponse>(CURRENT_CART, &[]).await {
            Ok(response) => Ok(response.cart),
            Err(e) if e.is_not_found() => {
                debug!("No current cart");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Add lines to the current cart, creating it when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn add_to_cart(&self, line_items: &[AddLineItem]) -> Result<Cart, WixError> {
        let response = self
            .post(
                &format!("{CURRENT_CART}/add-to-cart"),
                &AddToCartBody { line_items },
            )
            .await?;
        into_cart(response)
    }

    /// Change quantities of existing lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, updates), fields(lines = updates.len()))]
    pub async fn update_line_items_quantity(
        &self,
        updates: &[LineItemQuantityUpdate],
    ) -> Result<Cart, WixError> {
        let response = self
            .post(
                &format!("{CURRENT_CART}/update-line-items-quantity"),
                &UpdateQuantityBody {
                    line_items: updates,
                },
            )
            .await?;
        into_cart(response)
    }

    /// Remove lines from the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line_item_ids), fields(lines = line_item_ids.len()))]
    pub async fn remove_line_items(&self, line_item_ids: &[LineItemId]) -> Result<Cart, WixError> {
        let response = self
            .post(
                &format!("{CURRENT_CART}/remove-line-items"),
                &RemoveLineItemsBody { line_item_ids },
            )
            .await?;
        into_cart(response)
    }
}
