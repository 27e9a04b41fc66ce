//! Product search component: filters, request building, result mapping and
//! stale-response protection.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use wix_headless_core::{AvailabilityStatus, CategoryId};

use super::pricing::{PriceRangeOption, map_price_buckets, price_aggregation, result_symbol};
use super::product_card::{ProductCardViewState, product_cards};
use crate::wix::{
    CursorPaging, CursorSearch, Filter, MIN_PRICE_FIELD, PRICE_AGGREGATION, SearchDetails,
    SearchPage, Sorting,
};

/// Products per search page.
pub const SEARCH_PAGE_SIZE: u32 = 24;

const CATEGORIES_FIELD: &str = "allCategoriesInfo.categories";
const AVAILABILITY_FIELD: &str = "inventory.availabilityStatus";

/// Product sort keys offered by listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    Newest,
}

impl ProductSort {
    /// All sort keys in display order.
    pub const ALL: &'static [Self] = &[
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
        Self::Newest,
    ];

    /// Sort clause, `None` for the vendor's own order.
    #[must_use]
    pub fn sorting(self) -> Option<Sorting> {
        match self {
            Self::Relevance => None,
            Self::PriceAsc => Some(Sorting::asc(MIN_PRICE_FIELD)),
            Self::PriceDesc => Some(Sorting::desc(MIN_PRICE_FIELD)),
            Self::NameAsc => Some(Sorting::asc("name")),
            Self::NameDesc => Some(Sorting::desc("name")),
            Self::Newest => Some(Sorting::desc("_createdDate")),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A-Z",
            Self::NameDesc => "Name: Z-A",
            Self::Newest => "Newest",
        }
    }
}

/// What the shopper searched for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub query: String,
    pub category_ids: Vec<CategoryId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

impl SearchFilters {
    /// Filter part of the search request.
    #[must_use]
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::new().eq("visible", true);
        if !self.category_ids.is_empty() {
            filter = filter.match_items_with_ids(
                CATEGORIES_FIELD,
                self.category_ids.iter().map(ToString::to_string),
            );
        }
        if let Some(min) = self.min_price {
            filter = filter.gte(MIN_PRICE_FIELD, min);
        }
        if let Some(max) = self.max_price {
            filter = filter.lte(MIN_PRICE_FIELD, max);
        }
        if self.in_stock_only {
            filter = filter.is_in(
                AVAILABILITY_FIELD,
                [
                    AvailabilityStatus::InStock.as_str(),
                    AvailabilityStatus::PartiallyOutOfStock.as_str(),
                ],
            );
        }
        filter
    }

    /// First-page search request with the price aggregation.
    #[must_use]
    pub fn to_search(&self, limit: u32) -> CursorSearch {
        let expression = self.query.trim();
        CursorSearch {
            filter: self.filter().into_value(),
            sort: self.sort.sorting().into_iter().collect(),
            cursor_paging: Some(CursorPaging {
                limit: Some(limit),
                cursor: None,
            }),
            aggregations: vec![price_aggregation()],
            search: (!expression.is_empty()).then(|| SearchDetails::products(expression)),
        }
    }
}

/// Request for the page after `cursor`. The cursor carries filter and sort.
#[must_use]
pub fn next_search(cursor: &str, limit: u32) -> CursorSearch {
    CursorSearch {
        cursor_paging: Some(CursorPaging {
            limit: Some(limit),
            cursor: Some(cursor.to_string()),
        }),
        ..CursorSearch::default()
    }
}

/// Search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchViewState {
    pub query: String,
    pub products: Vec<ProductCardViewState>,
    pub total: u32,
    pub price_ranges: Vec<PriceRangeOption>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
    pub is_empty: bool,
}

impl SearchViewState {
    /// Map one search response.
    #[must_use]
    pub fn from_page(filters: &SearchFilters, page: &SearchPage) -> Self {
        let symbol = result_symbol(&page.products);
        let next_cursor = page.paging_metadata.next_cursor().map(str::to_string);
        let total = page
            .paging_metadata
            .count
            .unwrap_or_else(|| u32::try_from(page.products.len()).unwrap_or(u32::MAX));

        Self {
            query: filters.query.trim().to_string(),
            products: product_cards(&page.products),
            total,
            price_ranges: map_price_buckets(
                page.aggregation_data.range_buckets(PRICE_AGGREGATION),
                &symbol,
            ),
            has_more: next_cursor.is_some(),
            next_cursor,
            is_empty: page.products.is_empty(),
        }
    }
}

// =============================================================================
// Sequencing
// =============================================================================

/// Version handed out when a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub const fn version(self) -> u64 {
        self.0
    }
}

/// Discards responses of searches that were superseded by a newer one.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search; every later `begin` makes this ticket stale.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer search has started since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only when `ticket` is still current.
    pub fn complete<T>(&self, ticket: SearchTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_first_page_request() {
        let filters = SearchFilters {
            query: "  linen ".to_string(),
            category_ids: vec![CategoryId::new("shirts")],
            min_price: Some(10.0),
            max_price: Some(100.0),
            in_stock_only: true,
            sort: ProductSort::PriceAsc,
        };
        let json = serde_json::to_value(filters.to_search(SEARCH_PAGE_SIZE)).unwrap();

        assert_eq!(json["search"]["expression"], "linen");
        assert_eq!(json["search"]["fuzzy"], true);
        assert_eq!(json["filter"]["visible"]["$eq"], true);
        assert_eq!(
            json["filter"]["allCategoriesInfo.categories"]["$matchItems"][0]["_id"]["$in"][0],
            "shirts"
        );
        assert_eq!(json["filter"][MIN_PRICE_FIELD]["$gte"], 10.0);
        assert_eq!(json["filter"][MIN_PRICE_FIELD]["$lte"], 100.0);
        assert_eq!(
            json["filter"]["inventory.availabilityStatus"]["$in"],
            serde_json::json!(["IN_STOCK", "PARTIALLY_OUT_OF_STOCK"])
        );
        assert_eq!(json["sort"][0]["fieldName"], MIN_PRICE_FIELD);
        assert_eq!(json["sort"][0]["order"], "ASC");
        assert_eq!(json["cursorPaging"]["limit"], 24);
        assert_eq!(json["aggregations"][0]["name"], PRICE_AGGREGATION);
        assert_eq!(json["aggregations"][0]["type"], "RANGE");
    }

    #[test]
    fn test_empty_query_has_no_search_details() {
        let json = serde_json::to_value(SearchFilters::default().to_search(10)).unwrap();
        assert!(json.get("search").is_none());
        assert!(json.get("sort").is_none());
    }

    #[test]
    fn test_next_page_sends_only_paging() {
        let json = serde_json::to_value(next_search("abc", 24)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cursorPaging": { "limit": 24, "cursor": "abc" } })
        );
    }

    #[test]
    fn test_view_state_from_page() {
        let page: SearchPage = serde_json::from_value(serde_json::json!({
            "products": [{
                "_id": "p1", "name": "Linen Shirt", "slug": "linen-shirt", "currency": "ILS",
                "actualPriceRange": { "minValue": { "amount": "40", "formattedAmount": "₪40.00" } }
            }],
            "pagingMetadata": { "count": 1, "cursors": { "next": "c2" }, "hasNext": true },
            "aggregationData": { "results": [{
                "name": "price-ranges", "type": "RANGE", "fieldPath": MIN_PRICE_FIELD,
                "ranges": { "results": [
                    { "from": 0.0, "to": 50.0, "count": 1 },
                    { "from": 50.0, "to": 100.0, "count": 0 },
                    { "from": 500.0, "count": 2 }
                ] }
            }] }
        }))
        .unwrap();

        let filters = SearchFilters {
            query: "linen".to_string(),
            ..SearchFilters::default()
        };
        let view = SearchViewState::from_page(&filters, &page);
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.total, 1);
        assert!(view.has_more);
        assert_eq!(view.next_cursor.as_deref(), Some("c2"));
        assert!(!view.is_empty);

        let labels: Vec<_> = view.price_ranges.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["₪0 - ₪50", "₪500+"]);
    }

    #[test]
    fn test_empty_results() {
        let view = SearchViewState::from_page(&SearchFilters::default(), &SearchPage::default());
        assert!(view.is_empty);
        assert!(!view.has_more);
        assert!(view.price_ranges.is_empty());
    }

    #[test]
    fn test_sort_keys_round_trip_through_serde() {
        for sort in ProductSort::ALL {
            let json = serde_json::to_value(sort).unwrap();
            assert_eq!(json, sort.as_str());
        }
    }

    #[test]
    fn test_sequencer_discards_stale_results() {
        let sequencer = SearchSequencer::new();
        let first = sequencer.begin();
        let second = sequencer.begin();

        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert_eq!(sequencer.complete(first, "old"), None);
        assert_eq!(sequencer.complete(second, "new"), Some("new"));
    }

    #[tokio::test]
    async fn test_sequencer_across_tasks() {
        let sequencer = Arc::new(SearchSequencer::new());
        let slow = sequencer.begin();

        let fast = {
            let sequencer = Arc::clone(&sequencer);
            tokio::spawn(async move {
                let ticket = sequencer.begin();
                sequencer.complete(ticket, 2)
            })
            .await
            .unwrap()
        };

        assert_eq!(fast, Some(2));
        assert_eq!(sequencer.complete(slow, 1), None);
    }
}
