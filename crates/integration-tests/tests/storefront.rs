//! Catalog services and storefront routes backed by a mock Wix server.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;
use wix_headless_integration_tests::{
    application_error, paging, product_json, server_client, storefront_config,
};
use wix_headless_storefront::components::search::{ProductSort, SearchFilters};
use wix_headless_storefront::services::CatalogService;
use wix_headless_storefront::state::AppState;
use wix_headless_storefront::wix::PRICE_AGGREGATION;

fn search_response() -> Value {
    json!({
        "products": [
            product_json("p1", "classic-tee", "Classic Tee"),
            product_json("p2", "v-neck", "V-Neck")
        ],
        "pagingMetadata": paging(2, Some("next-page")),
        "aggregationData": {
            "results": [
                {
                    "name": PRICE_AGGREGATION,
                    "type": "RANGE",
                    "fieldPath": "actualPriceRange.minValue.amount",
                    "ranges": {
                        "results": [
                            { "from": 0.0, "to": 50.0, "count": 2 },
                            { "from": 50.0, "to": 100.0, "count": 0 },
                            { "from": 500.0, "count": 1 }
                        ]
                    }
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_search_maps_price_buckets() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/search")
                .body_contains(PRICE_AGGREGATION)
                .body_contains("\"expression\":\"tee\"");
            then.status(200).json_body(search_response());
        })
        .await;

    let catalog = CatalogService::new(server_client(&server.base_url()));
    let filters = SearchFilters {
        query: "  tee ".to_string(),
        ..SearchFilters::default()
    };
    let view = catalog.search(&filters, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(view.query, "tee");
    assert_eq!(view.products.len(), 2);
    assert_eq!(view.next_cursor.as_deref(), Some("next-page"));
    assert!(view.has_more);
    let labels: Vec<_> = view.price_ranges.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["$0 - $50", "$500+"]);
}

#[tokio::test]
async fn test_search_next_page_sends_only_cursor() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/search")
                .json_body_partial(r#"{ "search": { "cursorPaging": { "cursor": "next-page" } } }"#);
            then.status(200)
                .json_body(json!({ "products": [], "pagingMetadata": paging(0, None) }));
        })
        .await;

    let catalog = CatalogService::new(server_client(&server.base_url()));
    let view = catalog
        .search(&SearchFilters::default(), Some("next-page"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(view.is_empty);
    assert!(!view.has_more);
}

#[tokio::test]
async fn test_product_page_without_inventory_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/classic-tee");
            then.status(200)
                .json_body(json!({ "product": product_json("p1", "classic-tee", "Classic Tee") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/inventory-items/query");
            then.status(503);
        })
        .await;

    let catalog = CatalogService::new(server_client(&server.base_url()));
    let page = catalog.product_page("classic-tee").await.unwrap();

    let fast = page.fast();
    assert!(fast.in_stock);
    assert!(fast.add_to_cart_enabled);
    assert_eq!(page.slow().name, "Classic Tee");
}

#[tokio::test]
async fn test_category_page_loads_products() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/categories/v1/categories/slug/shirts");
            then.status(200).json_body(json!({
                "category": { "_id": "cat-1", "name": "Shirts", "slug": "shirts", "itemCounter": 2 }
            }));
        })
        .await;
    let products = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .body_contains("cat-1");
            then.status(200).json_body(json!({
                "products": [product_json("p1", "classic-tee", "Classic Tee")],
                "pagingMetadata": paging(1, None)
            }));
        })
        .await;

    let catalog = CatalogService::new(server_client(&server.base_url()));
    let (slow, fast) = catalog
        .category_page("shirts", ProductSort::PriceAsc)
        .await
        .unwrap();

    products.assert_async().await;
    assert_eq!(slow.name, "Shirts");
    assert_eq!(slow.product_count, 2);
    assert_eq!(fast.products.len(), 1);
    assert_eq!(fast.sort, ProductSort::PriceAsc);
    assert!(!fast.has_more);
}

#[tokio::test]
async fn test_product_route_renders() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/classic-tee");
            then.status(200)
                .json_body(json!({ "product": product_json("p1", "classic-tee", "Classic Tee") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/inventory-items/query");
            then.status(200)
                .json_body(json!({ "inventoryItems": [], "pagingMetadata": paging(0, None) }));
        })
        .await;

    let app = wix_headless_storefront::app(AppState::new(storefront_config(&server.base_url())));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/classic-tee")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Classic Tee"));
    assert!(html.contains("$19.90"));
}

#[tokio::test]
async fn test_missing_product_route_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/missing");
            then.status(404).json_body(application_error("PRODUCT_NOT_FOUND"));
        })
        .await;

    let app = wix_headless_storefront::app(AppState::new(storefront_config(&server.base_url())));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_api_returns_view_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/products/search");
            then.status(200).json_body(search_response());
        })
        .await;

    let app = wix_headless_storefront::app(AppState::new(storefront_config(&server.base_url())));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=tee")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["query"], "tee");
    assert_eq!(json["price_ranges"][0]["label"], "$0 - $50");
    assert_eq!(json["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_select_route_changes_quantity() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/classic-tee");
            then.status(200)
                .json_body(json!({ "product": product_json("p1", "classic-tee", "Classic Tee") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/inventory-items/query");
            then.status(200)
                .json_body(json!({ "inventoryItems": [], "pagingMetadata": paging(0, None) }));
        })
        .await;

    let app = wix_headless_storefront::app(AppState::new(storefront_config(&server.base_url())));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/products/classic-tee/select")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"quantity": 0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["quantity"], 1);
    assert_eq!(json["in_stock"], true);
}
