//! Price formatting and price-range facets.

use serde::Serialize;
use wix_headless_core::{Money, symbol_for};

use crate::wix::{
    Aggregation, MIN_PRICE_FIELD, PRICE_AGGREGATION, PriceValue, Product, RangeBucket, RangeResult,
};

/// Symbol used when there is nothing to take a currency from.
pub const DEFAULT_SYMBOL: &str = "$";

/// Bucket boundaries of the price facet: 0-50, 50-100, 100-200, 200-500, 500+.
pub const DEFAULT_PRICE_BOUNDARIES: &[(f64, Option<f64>)] = &[
    (0.0, Some(50.0)),
    (50.0, Some(100.0)),
    (100.0, Some(200.0)),
    (200.0, Some(500.0)),
    (500.0, None),
];

/// One selectable price range of the search facet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRangeOption {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub count: u64,
    pub label: String,
}

/// RANGE aggregation over the minimum actual price with the default buckets.
#[must_use]
pub fn price_aggregation() -> Aggregation {
    let buckets = DEFAULT_PRICE_BOUNDARIES
        .iter()
        .map(|&(from, to)| RangeBucket {
            from: Some(from),
            to,
        })
        .collect();
    Aggregation::range(PRICE_AGGREGATION, MIN_PRICE_FIELD, buckets)
}

/// Non-digit prefix of a formatted amount (`"₪19.90"` gives `"₪"`).
fn formatted_prefix(formatted: &str) -> Option<&str> {
    let end = formatted
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .unwrap_or(formatted.len());
    let prefix = formatted[..end].trim();
    (!prefix.is_empty()).then_some(prefix)
}

/// Currency symbol of a product.
///
/// Taken from the formatted price prefix when there is one, otherwise from
/// the currency code.
#[must_use]
pub fn product_symbol(product: &Product) -> Option<String> {
    product
        .min_price()
        .and_then(|p| p.formatted_amount.as_deref())
        .and_then(formatted_prefix)
        .map(str::to_string)
        .or_else(|| product.currency.as_deref().map(symbol_for))
}

/// Currency symbol for a result set, resolved from its first product.
#[must_use]
pub fn result_symbol(products: &[Product]) -> String {
    products
        .first()
        .and_then(product_symbol)
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
}

/// Label of one bucket: `"$0 - $50"`, or `"$500+"` when open-ended.
#[must_use]
pub fn bucket_label(symbol: &str, from: Option<f64>, to: Option<f64>) -> String {
    let from = from.unwrap_or(0.0);
    match to {
        Some(to) => format!("{symbol}{from} - {symbol}{to}"),
        None => format!("{symbol}{from}+"),
    }
}

/// Turn RANGE aggregation buckets into facet options, dropping empty ones.
#[must_use]
pub fn map_price_buckets(buckets: &[RangeResult], symbol: &str) -> Vec<PriceRangeOption> {
    buckets
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| PriceRangeOption {
            from: b.from,
            to: b.to,
            count: b.count,
            label: bucket_label(symbol, b.from, b.to),
        })
        .collect()
}

/// Display text of a catalog price.
///
/// Uses the vendor formatted amount, falling back to symbol + amount.
#[must_use]
pub fn format_price(price: &PriceValue, symbol: &str) -> Option<String> {
    price
        .formatted_amount
        .clone()
        .filter(|f| !f.is_empty())
        .or_else(|| price.amount.as_ref().map(|a| format!("{symbol}{a}")))
}

/// Decimal amount of a catalog price.
#[must_use]
pub fn price_money(price: &PriceValue, currency: &str) -> Option<Money> {
    price
        .amount
        .as_deref()
        .and_then(|a| Money::parse(a, currency).ok())
}

/// Whether `compare_at` is strictly above `actual`.
#[must_use]
pub fn is_discounted(actual: Option<&PriceValue>, compare_at: Option<&PriceValue>) -> bool {
    match (
        actual.and_then(|p| price_money(p, "")),
        compare_at.and_then(|p| price_money(p, "")),
    ) {
        (Some(actual), Some(compare_at)) => compare_at.amount > actual.amount,
        _ => false,
    }
}
