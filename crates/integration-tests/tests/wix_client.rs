//! API-key client against a mock Wix server: auth headers, cursor paging,
//! error mapping and caching.

#![allow(clippy::unwrap_used)]

use httpmock::prelude::*;
use serde_json::json;
use wix_headless_integration_tests::{
    API_KEY, SITE_ID, application_error, paging, product_json, server_client,
};
use wix_headless_storefront::wix::{
    CursorQuery, Filter, ProductField, WixError, collect_all_capped,
};

fn visible_products() -> CursorQuery {
    CursorQuery::with_limit(2).filter(Filter::new().eq("visible", true))
}

#[tokio::test]
async fn test_sends_api_key_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .header("Authorization", API_KEY)
                .header("wix-site-id", SITE_ID);
            then.status(200)
                .json_body(json!({ "products": [], "pagingMetadata": paging(0, None) }));
        })
        .await;

    let page = server_client(&server.base_url())
        .query_products(&CursorQuery::with_limit(10), &[])
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(page.products.is_empty());
}

#[tokio::test]
async fn test_query_all_follows_cursors() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .body_contains("\"filter\"");
            then.status(200).json_body(json!({
                "products": [product_json("p1", "one", "One"), product_json("p2", "two", "Two")],
                "pagingMetadata": paging(2, Some("c2"))
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .body_contains("\"cursor\":\"c2\"");
            then.status(200).json_body(json!({
                "products": [product_json("p3", "three", "Three")],
                "pagingMetadata": paging(1, None)
            }));
        })
        .await;

    let collected = server_client(&server.base_url())
        .query_all_products(visible_products(), ProductField::CARD)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(collected.pages, 2);
    assert!(!collected.truncated);
    let ids: Vec<_> = collected.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn test_later_pages_send_only_paging() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .body_contains("\"filter\"");
            then.status(200).json_body(json!({
                "products": [product_json("p1", "one", "One")],
                "pagingMetadata": paging(1, Some("c2"))
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .json_body_partial(r#"{ "query": { "cursorPaging": { "cursor": "c2", "limit": 2 } } }"#);
            then.status(200)
                .json_body(json!({ "products": [], "pagingMetadata": paging(0, None) }));
        })
        .await;
    let second_with_filter = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/products/query")
                .body_contains("\"cursor\"")
                .body_contains("\"filter\"");
            then.status(400);
        })
        .await;

    server_client(&server.base_url())
        .query_all_products(visible_products(), &[])
        .await
        .unwrap();

    second.assert_async().await;
    assert_eq!(second_with_filter.hits_async().await, 0);
}

#[tokio::test]
async fn test_paging_stops_at_cap() {
    let server = MockServer::start_async().await;
    let endless = server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/products/query");
            then.status(200).json_body(json!({
                "products": [product_json("p", "p", "P")],
                "pagingMetadata": paging(1, Some("again"))
            }));
        })
        .await;

    let client = server_client(&server.base_url());
    let collected = collect_all_capped(CursorQuery::with_limit(1), 3, |q| {
        let client = client.clone();
        async move {
            let page = client.query_products(&q, &[]).await?;
            Ok((page.products, page.paging_metadata))
        }
    })
    .await
    .unwrap();

    assert_eq!(endless.hits_async().await, 3);
    assert_eq!(collected.pages, 3);
    assert_eq!(collected.items.len(), 3);
    assert!(collected.truncated);
}

#[tokio::test]
async fn test_page_error_is_returned() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stores/v3/products/query");
            then.status(500).body("boom");
        })
        .await;

    let err = server_client(&server.base_url())
        .query_all_products(visible_products(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, WixError::Api { status: 500, .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/busy");
            then.status(429).header("Retry-After", "7");
        })
        .await;

    let err = server_client(&server.base_url())
        .get_product_by_slug("busy")
        .await
        .unwrap_err();

    assert!(matches!(err, WixError::RateLimited(7)));
}

#[tokio::test]
async fn test_product_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/missing");
            then.status(404).json_body(application_error("PRODUCT_NOT_FOUND"));
        })
        .await;

    let err = server_client(&server.base_url())
        .get_product_by_slug("missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        WixError::Api { code, .. } => assert_eq!(code.as_deref(), Some("PRODUCT_NOT_FOUND")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_product_by_slug_is_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/slug/classic-tee");
            then.status(200)
                .json_body(json!({ "product": product_json("p1", "classic-tee", "Classic Tee") }));
        })
        .await;

    let client = server_client(&server.base_url());
    let first = client.get_product_by_slug("classic-tee").await.unwrap();
    let second = client.get_product_by_slug("classic-tee").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.hits_async().await, 1);

    client.invalidate_cache();
    client.get_product_by_slug("classic-tee").await.unwrap();
    assert_eq!(mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_get_product_by_id_is_not_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stores/v3/products/p1");
            then.status(200)
                .json_body(json!({ "product": product_json("p1", "classic-tee", "Classic Tee") }));
        })
        .await;

    let client = server_client(&server.base_url());
    client.get_product("p1", ProductField::PAGE).await.unwrap();
    client.get_product("p1", ProductField::PAGE).await.unwrap();

    assert_eq!(mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_category_by_slug_sends_tree_reference() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/categories/v1/categories/slug/shirts")
                .query_param("treeReference.appNamespace", "@wix/stores");
            then.status(200).json_body(json!({
                "category": { "_id": "cat-1", "name": "Shirts", "slug": "shirts", "itemCounter": 4 }
            }));
        })
        .await;

    let category = server_client(&server.base_url())
        .get_category_by_slug("shirts")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(category.id.as_str(), "cat-1");
    assert_eq!(category.name.as_deref(), Some("Shirts"));
}

#[tokio::test]
async fn test_inventory_for_products_filters_by_product() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stores/v3/inventory-items/query")
                .json_body_partial(r#"{ "query": { "filter": { "productId": { "$in": ["p1"] } } } }"#);
            then.status(200).json_body(json!({
                "inventoryItems": [
                    { "_id": "inv-1", "productId": "p1", "variantId": "p1-v1", "inStock": true, "quantity": 3 }
                ],
                "pagingMetadata": paging(1, None)
            }));
        })
        .await;

    let client = server_client(&server.base_url());
    let items = client.inventory_for_products(&["p1"]).await.unwrap();
    assert!(client.inventory_for_products(&[]).await.unwrap().is_empty());

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].variant_id.as_str(), "p1-v1");
}
