//! Shared vendor shapes: paging metadata, media, prices.

use serde::{Deserialize, Serialize};

// =============================================================================
// Paging
// =============================================================================

/// Cursor paging request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPaging {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Continuation token returned by the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Cursors returned with a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Paging metadata attached to every query/search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingMetadata {
    /// Number of items in this page.
    pub count: Option<u32>,
    /// Continuation cursors.
    pub cursors: Option<Cursors>,
    /// Whether another page exists.
    pub has_next: Option<bool>,
}

impl PagingMetadata {
    /// Cursor for the next page, if there is one.
    ///
    /// `hasNext: false` always ends paging. Otherwise a non-empty `next`
    /// cursor continues it.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next == Some(false) {
            return None;
        }
        self.cursors
            .as_ref()
            .and_then(|c| c.next.as_deref())
            .filter(|c| !c.is_empty())
    }
}

// =============================================================================
// Media
// =============================================================================

/// Image details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// An image reference.
///
/// Depending on the endpoint Wix returns either a bare `wix:image://` URI or
/// an image object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Uri(String),
    Info(ImageInfo),
}

impl ImageRef {
    /// Raw URL or URI of the image.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(uri.as_str()),
            Self::Info(info) => info.url.as_deref().or(info.id.as_deref()),
        }
    }

    /// Alt text, when the object form carries one.
    #[must_use]
    pub fn alt_text(&self) -> Option<&str> {
        match self {
            Self::Uri(_) => None,
            Self::Info(info) => info.alt_text.as_deref(),
        }
    }

    /// Pixel dimensions, when known.
    #[must_use]
    pub const fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::Uri(_) => (None, None),
            Self::Info(info) => (info.width, info.height),
        }
    }
}

/// Kind of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

/// One entry of a product's media gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub display_name: Option<String>,
    pub media_type: Option<MediaType>,
    pub image: Option<ImageRef>,
    pub video: Option<ImageRef>,
    pub thumbnail: Option<ImageInfo>,
}

/// Product media: the main item plus the full gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub main: Option<MediaItem>,
    pub items_info: Option<MediaItemsInfo>,
}

/// Gallery wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemsInfo {
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

// =============================================================================
// Prices
// =============================================================================

/// A price as returned by Catalog V3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceValue {
    /// Decimal amount as string (preserves precision).
    pub amount: Option<String>,
    /// Amount formatted in the site's currency, e.g. `"$19.90"`.
    pub formatted_amount: Option<String>,
}

/// Min/max price across a product's variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_value: Option<PriceValue>,
    pub max_value: Option<PriceValue>,
}

/// A price in the eCommerce (cart) APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiCurrencyPrice {
    pub amount: Option<String>,
    pub converted_amount: Option<String>,
    pub formatted_amount: Option<String>,
    pub formatted_converted_amount: Option<String>,
}

impl MultiCurrencyPrice {
    /// Amount in the visitor's currency, falling back to the site currency.
    #[must_use]
    pub fn effective_amount(&self) -> Option<&str> {
        self.converted_amount
            .as_deref()
            .or(self.amount.as_deref())
    }

    /// Formatted amount in the visitor's currency, falling back to the site currency.
    #[must_use]
    pub fn effective_formatted(&self) -> Option<&str> {
        self.formatted_converted_amount
            .as_deref()
            .or(self.formatted_amount.as_deref())
    }
}

/// Translatable text in the eCommerce APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableString {
    pub original: Option<String>,
    pub translated: Option<String>,
}

impl TranslatableString {
    /// Translated value, falling back to the original.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.translated
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.original.as_deref())
    }
}
