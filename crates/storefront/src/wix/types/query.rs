//! Query and search request shapes, including the filter DSL and aggregations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::common::{CursorPaging, PagingMetadata};
use super::product::Product;

// =============================================================================
// Filters
// =============================================================================

/// Builder for the Wix filter DSL (`{"field": {"$op": value}}`).
///
/// Conditions on different fields are combined with an implicit AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Empty filter (matches everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn op(mut self, field: &str, op: &str, value: Value) -> Self {
        let entry = self
            .0
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(ops) = entry {
            ops.insert(op.to_string(), value);
        }
        self
    }

    /// `field == value`.
    #[must_use]
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, "$eq", value.into())
    }

    /// `field` in `values`.
    #[must_use]
    pub fn is_in<V: Into<Value>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.op(field, "$in", Value::Array(values))
    }

    /// `field >= value`.
    #[must_use]
    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, "$gte", value.into())
    }

    /// `field <= value`.
    #[must_use]
    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, "$lte", value.into())
    }

    /// Array `field` has an element with `_id` in `ids`.
    #[must_use]
    pub fn match_items_with_ids<V: Into<Value>>(
        self,
        field: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> Self {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        self.op(field, "$matchItems", json!([{ "_id": { "$in": ids } }]))
    }

    /// Whether no condition was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Filter as JSON, or `None` when empty.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        if self.0.is_empty() {
            None
        } else {
            Some(Value::Object(self.0))
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One sort clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub field_name: String,
    pub order: SortOrder,
}

impl Sorting {
    /// Ascending on `field`.
    #[must_use]
    pub fn asc(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
            order: SortOrder::Asc,
        }
    }

    /// Descending on `field`.
    #[must_use]
    pub fn desc(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
            order: SortOrder::Desc,
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// Cursor query used by the `.../query` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sorting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_paging: Option<CursorPaging>,
}

impl CursorQuery {
    /// Query with a page size.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            cursor_paging: Some(CursorPaging {
                limit: Some(limit),
                cursor: None,
            }),
            ..Self::default()
        }
    }

    /// Set the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter.into_value();
        self
    }

    /// Append a sort clause.
    #[must_use]
    pub fn sort(mut self, sorting: Sorting) -> Self {
        self.sort.push(sorting);
        self
    }

    /// Query for the page after `cursor`.
    ///
    /// Wix rejects filter and sort together with a cursor: the cursor already
    /// encodes them, so only paging is sent.
    #[must_use]
    pub fn next_page(&self, cursor: &str) -> Self {
        Self {
            filter: None,
            sort: Vec::new(),
            cursor_paging: Some(CursorPaging {
                limit: self.cursor_paging.as_ref().and_then(|p| p.limit),
                cursor: Some(cursor.to_string()),
            }),
        }
    }
}

/// `{ "products": [...], "pagingMetadata": ... }` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}

// =============================================================================
// Search
// =============================================================================

/// Free-text search details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDetails {
    pub expression: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    pub fuzzy: bool,
}

impl SearchDetails {
    /// Fuzzy search over product name and description.
    #[must_use]
    pub fn products(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            fields: vec!["name".to_string(), "plainDescription".to_string()],
            fuzzy: true,
        }
    }
}

/// A range bucket boundary pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
}

/// Range aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAggregation {
    pub buckets: Vec<RangeBucket>,
}

/// Aggregation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    Value,
    Range,
    Scalar,
    #[serde(other)]
    Unknown,
}

/// An aggregation requested with a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AggregationType,
    pub field_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeAggregation>,
}

impl Aggregation {
    /// Range aggregation over `field_path` with the given bucket boundaries.
    #[must_use]
    pub fn range(name: &str, field_path: &str, buckets: Vec<RangeBucket>) -> Self {
        Self {
            name: name.to_string(),
            kind: AggregationType::Range,
            field_path: field_path.to_string(),
            range: Some(RangeAggregation { buckets }),
        }
    }
}

/// Cursor search used by `products/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sorting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_paging: Option<CursorPaging>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Aggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchDetails>,
}

/// One bucket of a range aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeResult {
    pub from: Option<f64>,
    pub to: Option<f64>,
    #[serde(default)]
    pub count: u64,
}

/// Range results wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeResults {
    #[serde(default)]
    pub results: Vec<RangeResult>,
}

/// One aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AggregationType>,
    pub field_path: Option<String>,
    pub ranges: Option<RangeResults>,
}

/// Aggregation results wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationData {
    #[serde(default)]
    pub results: Vec<AggregationResult>,
}

impl AggregationData {
    /// Range buckets of the aggregation named `name`.
    #[must_use]
    pub fn range_buckets(&self, name: &str) -> &[RangeResult] {
        self.results
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
            .and_then(|r| r.ranges.as_ref())
            .map_or(&[], |r| r.results.as_slice())
    }
}

/// `products/search` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
    #[serde(default)]
    pub aggregation_data: AggregationData,
}
