//! Catalog V3 product shapes.

use serde::{Deserialize, Serialize};
use wix_headless_core::{
    AvailabilityStatus, CategoryId, ChoiceId, ModifierId, OptionId, ProductId, VariantId,
};

use super::common::{Media, MediaItem, PriceRange, PriceValue};

/// A product in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: ProductId,
    /// Product name.
    pub name: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Whether the product is visible on the site.
    pub visible: Option<bool>,
    /// Plain text description (requires the `PLAIN_DESCRIPTION` field).
    pub plain_description: Option<String>,
    /// Main media item and gallery.
    pub media: Option<Media>,
    /// Badge such as "Sale" or "New".
    pub ribbon: Option<NamedRef>,
    /// Brand.
    pub brand: Option<NamedRef>,
    /// Aggregated stock status.
    pub inventory: Option<ProductInventory>,
    /// Price range across visible variants.
    pub actual_price_range: Option<PriceRange>,
    /// Compare-at price range across visible variants.
    pub compare_at_price_range: Option<PriceRange>,
    /// Site currency code (requires the `CURRENCY` field).
    pub currency: Option<String>,
    /// Options that define variants (size, color).
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Modifiers that do not define variants (engraving text).
    #[serde(default)]
    pub modifiers: Vec<ProductModifier>,
    /// Pre-computed variants.
    pub variants_info: Option<VariantsInfo>,
    /// Main category.
    pub main_category_id: Option<CategoryId>,
    /// Every category the product is assigned to.
    pub all_categories_info: Option<AllCategoriesInfo>,
    /// Creation timestamp.
    pub created_date: Option<String>,
}

impl Product {
    /// All variants, or an empty slice when variants were not returned.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        self.variants_info
            .as_ref()
            .map_or(&[], |info| info.variants.as_slice())
    }

    /// Availability status, defaulting to unknown.
    #[must_use]
    pub fn availability(&self) -> AvailabilityStatus {
        self.inventory
            .as_ref()
            .and_then(|i| i.availability_status)
            .unwrap_or_default()
    }

    /// Lowest actual price.
    #[must_use]
    pub fn min_price(&self) -> Option<&PriceValue> {
        self.actual_price_range
            .as_ref()
            .and_then(|r| r.min_value.as_ref())
    }

    /// Lowest compare-at price.
    #[must_use]
    pub fn min_compare_at_price(&self) -> Option<&PriceValue> {
        self.compare_at_price_range
            .as_ref()
            .and_then(|r| r.min_value.as_ref())
    }

    /// IDs of all categories the product belongs to.
    pub fn category_ids(&self) -> impl Iterator<Item = &CategoryId> {
        self.all_categories_info
            .iter()
            .flat_map(|info| info.categories.iter().map(|c| &c.id))
    }
}

/// Something referenced by name only (ribbon, brand).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Aggregated product stock information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInventory {
    pub availability_status: Option<AvailabilityStatus>,
    pub preorder_status: Option<String>,
}

/// How an option is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRenderType {
    #[default]
    TextChoices,
    SwatchChoices,
    #[serde(other)]
    Unknown,
}

/// Product option definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    /// Option ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: OptionId,
    /// Option name (e.g., "Size").
    pub name: Option<String>,
    /// Text or swatch choices.
    pub option_render_type: Option<OptionRenderType>,
    /// Available choices.
    pub choices_settings: Option<ChoicesSettings>,
}

impl ProductOption {
    /// All choices, or an empty slice.
    #[must_use]
    pub fn choices(&self) -> &[OptionChoice] {
        self.choices_settings
            .as_ref()
            .map_or(&[], |s| s.choices.as_slice())
    }
}

/// Choice list wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicesSettings {
    #[serde(default)]
    pub choices: Vec<OptionChoice>,
}

/// One choice of an option or modifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoice {
    /// Choice ID.
    #[serde(alias = "_id", default)]
    pub choice_id: ChoiceId,
    /// Display name (e.g., "Large").
    pub name: Option<String>,
    /// Hex color for swatches.
    pub color_code: Option<String>,
    /// Whether any variant with this choice is in stock.
    pub in_stock: Option<bool>,
    /// Whether the choice is visible.
    pub visible: Option<bool>,
}

/// How a modifier is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModifierRenderType {
    FreeText,
    #[default]
    TextChoices,
    SwatchChoices,
    #[serde(other)]
    Unknown,
}

/// A product modifier (customization that does not change the variant).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductModifier {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: ModifierId,
    pub name: Option<String>,
    pub modifier_render_type: Option<ModifierRenderType>,
    /// Whether the shopper must fill this modifier.
    pub mandatory: Option<bool>,
    pub free_text_settings: Option<FreeTextSettings>,
    pub choices_settings: Option<ChoicesSettings>,
}

/// Free-text modifier constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTextSettings {
    pub min_char_count: Option<u32>,
    pub max_char_count: Option<u32>,
    pub title: Option<String>,
}

/// Variants wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantsInfo {
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A product variant (specific combination of option choices).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variant ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: VariantId,
    /// Whether the variant is visible.
    pub visible: Option<bool>,
    /// SKU code.
    pub sku: Option<String>,
    /// Barcode.
    pub barcode: Option<String>,
    /// Option choices that make up this variant.
    #[serde(default)]
    pub choices: Vec<VariantChoice>,
    /// Price.
    pub price: Option<VariantPrice>,
    /// Stock status.
    pub inventory_status: Option<VariantInventoryStatus>,
    /// Variant-specific media.
    pub media: Option<MediaItem>,
}

impl Variant {
    /// Whether the variant can be bought (in stock or preorderable).
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.inventory_status
            .as_ref()
            .is_some_and(|s| s.in_stock.unwrap_or(false) || s.preorder_enabled.unwrap_or(false))
    }

    /// Option/choice ID pairs of this variant.
    pub fn choice_ids(&self) -> impl Iterator<Item = (&OptionId, &ChoiceId)> {
        self.choices
            .iter()
            .filter_map(|c| c.option_choice_ids.as_ref())
            .map(|ids| (&ids.option_id, &ids.choice_id))
    }
}

/// One choice of a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantChoice {
    pub option_choice_ids: Option<OptionChoiceIds>,
    pub option_choice_names: Option<OptionChoiceNames>,
}

/// Option and choice IDs of a variant choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoiceIds {
    #[serde(default)]
    pub option_id: OptionId,
    #[serde(default)]
    pub choice_id: ChoiceId,
}

/// Option and choice names of a variant choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoiceNames {
    pub option_name: Option<String>,
    pub choice_name: Option<String>,
}

/// Variant price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    pub actual_price: Option<PriceValue>,
    pub compare_at_price: Option<PriceValue>,
}

/// Variant stock status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInventoryStatus {
    pub in_stock: Option<bool>,
    pub preorder_enabled: Option<bool>,
}

/// Categories wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllCategoriesInfo {
    #[serde(default)]
    pub categories: Vec<ProductCategoryRef>,
}

/// A category assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategoryRef {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: CategoryId,
    pub index: Option<u32>,
}

/// Extra fields requested from Catalog V3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductField {
    Url,
    Currency,
    PlainDescription,
    MediaItemsInfo,
    VariantOptionChoiceNames,
    BreadcrumbsInfo,
    AllCategoriesInfo,
}

impl ProductField {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Currency => "CURRENCY",
            Self::PlainDescription => "PLAIN_DESCRIPTION",
            Self::MediaItemsInfo => "MEDIA_ITEMS_INFO",
            Self::VariantOptionChoiceNames => "VARIANT_OPTION_CHOICE_NAMES",
            Self::BreadcrumbsInfo => "BREADCRUMBS_INFO",
            Self::AllCategoriesInfo => "ALL_CATEGORIES_INFO",
        }
    }

    /// Fields needed to render a full product page.
    pub const PAGE: &'static [Self] = &[
        Self::Url,
        Self::Currency,
        Self::PlainDescription,
        Self::MediaItemsInfo,
        Self::VariantOptionChoiceNames,
        Self::BreadcrumbsInfo,
    ];

    /// Fields needed to render product cards.
    pub const CARD: &'static [Self] = &[Self::Url, Self::Currency];
}

/// `{ "product": ... }` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub product: Option<Product>,
}
