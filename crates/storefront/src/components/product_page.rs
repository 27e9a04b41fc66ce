//! Product page component.
//!
//! - slow render: static product metadata ([`ProductPageSlowViewState`])
//! - fast render: live stock for the current selection ([`ProductPageFastViewState`])
//! - interactive: choice selection, quantity, modifier text and add-to-cart

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use wix_headless_core::{ChoiceId, ModifierId, OptionId, VariantId};

use super::UNNAMED;
use super::media::{MediaViewState, gallery_for_variant, product_gallery};
use super::pricing::{DEFAULT_SYMBOL, format_price, is_discounted, product_symbol};
use super::variants::{
    ChoiceAvailability, Selection, choice_availability, default_selection, find_exact_variant,
    resolve_variant,
};
use crate::wix::{
    AddLineItem, CatalogOptions, CatalogReference, InventoryItem, ModifierRenderType,
    OptionChoice, OptionRenderType, Product, ProductModifier, Variant,
};

/// Smallest quantity that can be added.
pub const MIN_QUANTITY: u32 = 1;
/// Largest quantity that can be added in one go.
pub const MAX_QUANTITY: u32 = 99_999;

/// Why an interaction was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductPageError {
    #[error("Unknown option: {0}")]
    UnknownOption(OptionId),
    #[error("Unknown choice {choice} for option {option}")]
    UnknownChoice { option: OptionId, choice: ChoiceId },
    #[error("Product has no variants")]
    NoVariant,
    #[error("This combination is not available")]
    NoMatchingVariant,
    #[error("Selected variant is out of stock")]
    OutOfStock,
    #[error("Please fill in \"{0}\"")]
    MissingModifier(String),
    #[error("\"{name}\" must be at most {max} characters")]
    ModifierTooLong { name: String, max: u32 },
}

// =============================================================================
// View states
// =============================================================================

/// One choice of an option or modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub id: String,
    pub name: String,
    pub color_code: Option<String>,
}

impl From<&OptionChoice> for ChoiceView {
    fn from(choice: &OptionChoice) -> Self {
        Self {
            id: choice.choice_id.to_string(),
            name: choice.name.clone().unwrap_or_default(),
            color_code: choice.color_code.clone(),
        }
    }
}

/// A variant-defining option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub id: String,
    pub name: String,
    pub swatch: bool,
    pub choices: Vec<ChoiceView>,
}

/// How a modifier is filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModifierKind {
    FreeText {
        max_chars: Option<u32>,
        title: Option<String>,
    },
    Choices {
        swatch: bool,
        choices: Vec<ChoiceView>,
    },
}

/// A modifier (customization that does not change the variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierView {
    pub id: String,
    pub name: String,
    pub mandatory: bool,
    pub kind: ModifierKind,
}

impl From<&ProductModifier> for ModifierView {
    fn from(modifier: &ProductModifier) -> Self {
        let choices = || {
            modifier
                .choices_settings
                .as_ref()
                .map(|s| s.choices.iter().map(ChoiceView::from).collect())
                .unwrap_or_default()
        };
        let kind = match modifier.modifier_render_type.unwrap_or_default() {
            ModifierRenderType::FreeText => ModifierKind::FreeText {
                max_chars: modifier
                    .free_text_settings
                    .as_ref()
                    .and_then(|s| s.max_char_count),
                title: modifier
                    .free_text_settings
                    .as_ref()
                    .and_then(|s| s.title.clone()),
            },
            ModifierRenderType::SwatchChoices => ModifierKind::Choices {
                swatch: true,
                choices: choices(),
            },
            ModifierRenderType::TextChoices | ModifierRenderType::Unknown => {
                ModifierKind::Choices {
                    swatch: false,
                    choices: choices(),
                }
            }
        };

        Self {
            id: modifier.id.to_string(),
            name: modifier.name.clone().unwrap_or_default(),
            mandatory: modifier.mandatory.unwrap_or(false),
            kind,
        }
    }
}

/// Static product data, cacheable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPageSlowViewState {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub ribbon: Option<String>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub media: Vec<MediaViewState>,
    pub options: Vec<OptionView>,
    pub modifiers: Vec<ModifierView>,
    pub category_id: Option<String>,
}

/// The variant the current selection resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedVariantViewState {
    pub id: String,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    pub has_discount: bool,
    pub in_stock: bool,
    /// Choice names joined, e.g. `"M / Blue"`.
    pub description: String,
    /// Whether the selection matched this variant exactly.
    pub exact: bool,
}

/// Live data for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPageFastViewState {
    pub selection: Selection,
    pub selected_variant: Option<SelectedVariantViewState>,
    /// Availability of every choice, keyed by option ID.
    pub choice_availability: BTreeMap<String, Vec<ChoiceAvailability>>,
    pub quantity: u32,
    pub max_quantity: u32,
    pub in_stock: bool,
    pub add_to_cart_enabled: bool,
    pub media: Vec<MediaViewState>,
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct StockLevel {
    available: bool,
    quantity: Option<u32>,
}

/// Live stock per variant, from inventory items.
#[derive(Debug, Clone, Default)]
pub struct VariantStock(HashMap<VariantId, StockLevel>);

impl VariantStock {
    #[must_use]
    pub fn from_inventory(items: &[InventoryItem]) -> Self {
        Self(
            items
                .iter()
                .map(|item| {
                    (
                        item.variant_id.clone(),
                        StockLevel {
                            available: item.is_available(),
                            quantity: item.available_quantity(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Live availability, falling back to the catalog flag.
    #[must_use]
    pub fn is_available(&self, variant: &Variant) -> bool {
        self.0
            .get(&variant.id)
            .map_or_else(|| variant.is_purchasable(), |s| s.available)
    }

    /// Units left when tracked.
    #[must_use]
    pub fn quantity(&self, variant: &Variant) -> Option<u32> {
        self.0.get(&variant.id).and_then(|s| s.quantity)
    }
}

// =============================================================================
// Component
// =============================================================================

/// Product page state for one visitor interaction.
#[derive(Debug, Clone)]
pub struct ProductPage {
    product: Product,
    stock: VariantStock,
    selection: Selection,
    quantity: u32,
    modifier_values: BTreeMap<ModifierId, String>,
}

impl ProductPage {
    /// Page with the default selection and quantity one.
    #[must_use]
    pub fn new(product: Product, inventory: &[InventoryItem]) -> Self {
        let selection = default_selection(&product);
        Self {
            product,
            stock: VariantStock::from_inventory(inventory),
            selection,
            quantity: MIN_QUANTITY,
            modifier_values: BTreeMap::new(),
        }
    }

    /// Underlying product.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Replace the whole selection, ignoring options the product does not have.
    pub fn set_selection(&mut self, selection: Selection) {
        let known: Selection = selection
            .into_iter()
            .filter(|(option, _)| self.product.options.iter().any(|o| &o.id == option))
            .collect();
        if !known.is_empty() {
            self.selection = known;
        }
    }

    /// Pick one choice of one option.
    ///
    /// # Errors
    ///
    /// Returns an error when the option or choice does not exist.
    pub fn select_choice(
        &mut self,
        option_id: OptionId,
        choice_id: ChoiceId,
    ) -> Result<(), ProductPageError> {
        let option = self
            .product
            .options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or_else(|| ProductPageError::UnknownOption(option_id.clone()))?;
        if !option.choices().iter().any(|c| c.choice_id == choice_id) {
            return Err(ProductPageError::UnknownChoice {
                option: option_id,
                choice: choice_id,
            });
        }
        self.selection.insert(option_id, choice_id);
        Ok(())
    }

    /// Set the quantity, clamped to `1..=99999`.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(MIN_QUANTITY, MAX_QUANTITY);
    }

    /// Set the text of a free-text modifier.
    pub fn set_modifier_text(&mut self, modifier_id: ModifierId, text: impl Into<String>) {
        self.modifier_values.insert(modifier_id, text.into());
    }

    fn selected(&self) -> Option<&Variant> {
        resolve_variant(self.product.variants(), &self.selection)
    }

    fn symbol(&self) -> String {
        product_symbol(&self.product).unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
    }

    /// Slow render.
    #[must_use]
    pub fn slow(&self) -> ProductPageSlowViewState {
        let product = &self.product;
        let symbol = self.symbol();
        let has_discount = is_discounted(product.min_price(), product.min_compare_at_price());

        ProductPageSlowViewState {
            id: product.id.to_string(),
            slug: product.slug.clone().unwrap_or_default(),
            name: product
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNNAMED.to_string()),
            description: product.plain_description.clone().unwrap_or_default(),
            brand: product.brand.as_ref().and_then(|b| b.name.clone()),
            ribbon: product.ribbon.as_ref().and_then(|r| r.name.clone()),
            price: product
                .min_price()
                .and_then(|p| format_price(p, &symbol))
                .unwrap_or_default(),
            compare_at_price: has_discount
                .then(|| product.min_compare_at_price())
                .flatten()
                .and_then(|p| format_price(p, &symbol)),
            media: product_gallery(product),
            options: product
                .options
                .iter()
                .map(|o| OptionView {
                    id: o.id.to_string(),
                    name: o.name.clone().unwrap_or_default(),
                    swatch: o.option_render_type == Some(OptionRenderType::SwatchChoices),
                    choices: o
                        .choices()
                        .iter()
                        .filter(|c| c.visible != Some(false))
                        .map(ChoiceView::from)
                        .collect(),
                })
                .collect(),
            modifiers: product.modifiers.iter().map(ModifierView::from).collect(),
            category_id: product.main_category_id.as_ref().map(ToString::to_string),
        }
    }

    fn variant_view(&self, variant: &Variant, exact: bool) -> SelectedVariantViewState {
        let symbol = self.symbol();
        let actual = variant.price.as_ref().and_then(|p| p.actual_price.as_ref());
        let compare_at = variant
            .price
            .as_ref()
            .and_then(|p| p.compare_at_price.as_ref());
        let has_discount = is_discounted(actual, compare_at);

        let description = variant
            .choices
            .iter()
            .filter_map(|c| c.option_choice_names.as_ref())
            .filter_map(|n| n.choice_name.as_deref())
            .collect::<Vec<_>>()
            .join(" / ");

        SelectedVariantViewState {
            id: variant.id.to_string(),
            sku: variant.sku.clone(),
            price: actual.and_then(|p| format_price(p, &symbol)),
            compare_at_price: if has_discount {
                compare_at.and_then(|p| format_price(p, &symbol))
            } else {
                None
            },
            has_discount,
            in_stock: self.stock.is_available(variant),
            description,
            exact,
        }
    }

    /// Fast render for the current selection.
    #[must_use]
    pub fn fast(&self) -> ProductPageFastViewState {
        let exact = find_exact_variant(self.product.variants(), &self.selection).is_some();
        let selected = self.selected();
        let selected_view = selected.map(|v| self.variant_view(v, exact));
        let in_stock = selected_view.as_ref().is_some_and(|v| v.in_stock);

        let max_quantity = selected
            .and_then(|v| self.stock.quantity(v))
            .map_or(MAX_QUANTITY, |q| q.clamp(MIN_QUANTITY, MAX_QUANTITY));

        let choice_availability = self
            .product
            .options
            .iter()
            .map(|o| {
                (
                    o.id.to_string(),
                    choice_availability(&self.product, &self.selection, &o.id, |v| {
                        self.stock.is_available(v)
                    }),
                )
            })
            .collect();

        ProductPageFastViewState {
            selection: self.selection.clone(),
            choice_availability,
            quantity: self.quantity.min(max_quantity),
            max_quantity,
            in_stock,
            add_to_cart_enabled: in_stock && exact && self.validate_modifiers().is_ok(),
            media: gallery_for_variant(&self.product, selected),
            selected_variant: selected_view,
        }
    }

    fn validate_modifiers(&self) -> Result<(), ProductPageError> {
        for modifier in &self.product.modifiers {
            if modifier.modifier_render_type != Some(ModifierRenderType::FreeText) {
                continue;
            }
            let name = modifier.name.clone().unwrap_or_default();
            let value = self
                .modifier_values
                .get(&modifier.id)
                .map_or("", |v| v.trim());

            if value.is_empty() {
                if modifier.mandatory.unwrap_or(false) {
                    return Err(ProductPageError::MissingModifier(name));
                }
                continue;
            }
            if let Some(max) = modifier
                .free_text_settings
                .as_ref()
                .and_then(|s| s.max_char_count)
                && value.chars().count() > max as usize
            {
                return Err(ProductPageError::ModifierTooLong { name, max });
            }
        }
        Ok(())
    }

    /// Cart line for the current selection.
    ///
    /// # Errors
    ///
    /// Returns an error when the selection matches no variant, the variant is
    /// out of stock, or a modifier value is missing or too long.
    pub fn add_to_cart_request(&self) -> Result<AddLineItem, ProductPageError> {
        let variants = self.product.variants();
        if variants.is_empty() {
            return Err(ProductPageError::NoVariant);
        }
        let variant = find_exact_variant(variants, &self.selection)
            .ok_or(ProductPageError::NoMatchingVariant)?;
        if !self.stock.is_available(variant) {
            return Err(ProductPageError::OutOfStock);
        }
        self.validate_modifiers()?;

        let custom_text_fields: BTreeMap<String, String> = self
            .product
            .modifiers
            .iter()
            .filter_map(|m| {
                let value = self.modifier_values.get(&m.id)?.trim();
                let title = m
                    .free_text_settings
                    .as_ref()
                    .and_then(|s| s.title.clone())
                    .or_else(|| m.name.clone())?;
                (!value.is_empty()).then(|| (title, value.to_string()))
            })
            .collect();

        let mut reference =
            CatalogReference::stores_variant(self.product.id.clone(), Some(variant.id.clone()));
        if !custom_text_fields.is_empty() {
            reference.options = Some(CatalogOptions {
                variant_id: Some(variant.id.clone()),
                custom_text_fields: Some(custom_text_fields),
            });
        }

        Ok(AddLineItem {
            catalog_reference: reference,
            quantity: self.quantity.clamp(MIN_QUANTITY, MAX_QUANTITY),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "mug",
            "name": "Mug",
            "slug": "mug",
            "plainDescription": "A mug.",
            "currency": "USD",
            "actualPriceRange": { "minValue": { "amount": "12", "formattedAmount": "$12.00" } },
            "options": [
                { "_id": "color", "name": "Color", "optionRenderType": "SWATCH_CHOICES", "choicesSettings": { "choices": [
                    { "choiceId": "white", "name": "White", "colorCode": "#fff" },
                    { "choiceId": "black", "name": "Black", "colorCode": "#000" }
                ] } }
            ],
            "modifiers": [
                { "_id": "engraving", "name": "Engraving", "modifierRenderType": "FREE_TEXT", "mandatory": true,
                  "freeTextSettings": { "maxCharCount": 5, "title": "Engraving text" } }
            ],
            "variantsInfo": { "variants": [
                { "_id": "v-white", "sku": "MUG-W",
                  "choices": [ { "optionChoiceIds": { "optionId": "color", "choiceId": "white" },
                                 "optionChoiceNames": { "optionName": "Color", "choiceName": "White" } } ],
                  "price": { "actualPrice": { "amount": "12", "formattedAmount": "$12.00" } },
                  "inventoryStatus": { "inStock": true } },
                { "_id": "v-black", "sku": "MUG-B",
                  "choices": [ { "optionChoiceIds": { "optionId": "color", "choiceId": "black" },
                                 "optionChoiceNames": { "optionName": "Color", "choiceName": "Black" } } ],
                  "price": { "actualPrice": { "amount": "14", "formattedAmount": "$14.00" },
                             "compareAtPrice": { "amount": "20", "formattedAmount": "$20.00" } },
                  "inventoryStatus": { "inStock": true } }
            ] }
        }))
        .unwrap()
    }

    fn out_of_stock_black() -> Vec<InventoryItem> {
        vec![
            serde_json::from_value(serde_json::json!({
                "variantId": "v-black", "trackQuantity": true, "quantity": 0
            }))
            .unwrap(),
        ]
    }

    #[test]
    fn test_slow_render() {
        let page = ProductPage::new(product(), &[]);
        let slow = page.slow();
        assert_eq!(slow.name, "Mug");
        assert_eq!(slow.description, "A mug.");
        assert_eq!(slow.price, "$12.00");
        assert!(slow.options[0].swatch);
        assert_eq!(slow.options[0].choices[1].color_code.as_deref(), Some("#000"));
        assert_eq!(
            slow.modifiers[0].kind,
            ModifierKind::FreeText {
                max_chars: Some(5),
                title: Some("Engraving text".to_string())
            }
        );
    }

    #[test]
    fn test_select_choice_updates_variant() {
        let mut page = ProductPage::new(product(), &[]);
        page.select_choice(OptionId::new("color"), ChoiceId::new("black"))
            .unwrap();

        let fast = page.fast();
        let variant = fast.selected_variant.unwrap();
        assert_eq!(variant.id, "v-black");
        assert_eq!(variant.description, "Black");
        assert_eq!(variant.price.as_deref(), Some("$14.00"));
        assert_eq!(variant.compare_at_price.as_deref(), Some("$20.00"));
        assert!(variant.exact);
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let mut page = ProductPage::new(product(), &[]);
        let err = page
            .select_choice(OptionId::new("color"), ChoiceId::new("green"))
            .unwrap_err();
        assert!(matches!(err, ProductPageError::UnknownChoice { .. }));

        let err = page
            .select_choice(OptionId::new("size"), ChoiceId::new("l"))
            .unwrap_err();
        assert_eq!(err, ProductPageError::UnknownOption(OptionId::new("size")));
    }

    #[test]
    fn test_live_inventory_overrides_catalog_stock() {
        let mut page = ProductPage::new(product(), &out_of_stock_black());
        page.select_choice(OptionId::new("color"), ChoiceId::new("black"))
            .unwrap();
        page.set_modifier_text(ModifierId::new("engraving"), "Hi");

        let fast = page.fast();
        assert!(!fast.in_stock);
        assert!(!fast.add_to_cart_enabled);

        let colors = &fast.choice_availability["color"];
        assert!(colors.iter().any(|c| c.choice_id.as_str() == "white" && c.available));
        assert!(colors.iter().any(|c| c.choice_id.as_str() == "black" && !c.available));

        assert_eq!(
            page.add_to_cart_request().unwrap_err(),
            ProductPageError::OutOfStock
        );
    }

    #[test]
    fn test_mandatory_free_text_blocks_add_to_cart() {
        let page = ProductPage::new(product(), &[]);
        assert!(!page.fast().add_to_cart_enabled);
        assert_eq!(
            page.add_to_cart_request().unwrap_err(),
            ProductPageError::MissingModifier("Engraving".to_string())
        );
    }

    #[test]
    fn test_modifier_length_limit() {
        let mut page = ProductPage::new(product(), &[]);
        page.set_modifier_text(ModifierId::new("engraving"), "Too long");
        assert_eq!(
            page.add_to_cart_request().unwrap_err(),
            ProductPageError::ModifierTooLong {
                name: "Engraving".to_string(),
                max: 5
            }
        );
    }

    #[test]
    fn test_add_to_cart_request() {
        let mut page = ProductPage::new(product(), &[]);
        page.set_modifier_text(ModifierId::new("engraving"), "Ada");
        page.set_quantity(0);

        let line = page.add_to_cart_request().unwrap();
        assert_eq!(line.quantity, 1);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["catalogReference"]["catalogItemId"], "mug");
        assert_eq!(json["catalogReference"]["options"]["variantId"], "v-white");
        assert_eq!(
            json["catalogReference"]["options"]["customTextFields"]["Engraving text"],
            "Ada"
        );
    }

    #[test]
    fn test_quantity_is_clamped() {
        let mut page = ProductPage::new(product(), &[]);
        page.set_quantity(250_000);
        assert_eq!(page.fast().quantity, MAX_QUANTITY);
    }
}
