//! Visitor cart operations.

use tracing::{info, instrument};
use wix_headless_core::LineItemId;

use crate::components::cart::{CartAction, CartIndicatorViewState, CartState, quantity_change};
use crate::wix::{AddLineItem, Cart, WixClient, WixError};

/// Cart operations with a visitor client.
#[derive(Debug, Clone)]
pub struct CartService {
    client: WixClient,
}

impl CartService {
    #[must_use]
    pub const fn new(client: WixClient) -> Self {
        Self { client }
    }

    /// The visitor's cart, `None` when they have none yet.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than "cart not found".
    pub async fn current(&self) -> Result<Option<Cart>, WixError> {
        self.client.current_cart().await
    }

    /// Header badge.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than "cart not found".
    pub async fn indicator(&self) -> Result<CartIndicatorViewState, WixError> {
        let cart = self.current().await?;
        Ok(CartIndicatorViewState::from_cart(cart.as_ref()))
    }

    /// Cart page.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than "cart not found".
    pub async fn state(&self) -> Result<CartState, WixError> {
        let cart = self.current().await?;
        Ok(CartState::from_cart(cart.as_ref()))
    }

    /// Add a line, creating the cart when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line), fields(product_id = %line.catalog_reference.catalog_item_id))]
    pub async fn add(&self, line: AddLineItem) -> Result<CartIndicatorViewState, WixError> {
        let cart = self.client.add_to_cart(std::slice::from_ref(&line)).await?;
        info!(quantity = line.quantity, "Added to cart");
        Ok(CartIndicatorViewState::from_cart(Some(&cart)))
    }

    /// Change the quantity of a line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line_item_id: LineItemId,
        quantity: u32,
    ) -> Result<CartState, WixError> {
        let cart = match quantity_change(line_item_id, quantity) {
            CartAction::Update(update) => {
                self.client
                    .update_line_items_quantity(std::slice::from_ref(&update))
                    .await?
            }
            CartAction::Remove(id) => {
                self.client
                    .remove_line_items(std::slice::from_ref(&id))
                    .await?
            }
        };
        Ok(CartState::from_cart(Some(&cart)))
    }

    /// Remove lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, line_item_ids: &[LineItemId]) -> Result<CartState, WixError> {
        if line_item_ids.is_empty() {
            return self.state().await;
        }
        let cart = self.client.remove_line_items(line_item_ids).await?;
        Ok(CartState::from_cart(Some(&cart)))
    }
}
