//! Product listing, response caching and concierge product search.

#![allow(clippy::unwrap_used)]

use baiyit_core::SessionId;
use baiyit_integration_tests::{TestContext, auth_json, page_json, product_json};
use baiyit_storefront::loaders::ProductFilter;
use baiyit_storefront::models::{ProductQuery, ProductUpdate};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_listing_encodes_only_set_parameters() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("category", "electronics"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            product_json("p1", "Pro Book", 999.99),
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let query = ProductQuery {
        page: Some(2),
        size: Some(5),
        category: Some("electronics".to_string()),
        featured: Some(true),
        ..ProductQuery::default()
    };
    let page = ctx
        .storefront
        .products()
        .list(&query)
        .await
        .into_result()
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].title, "Pro Book");
}

#[tokio::test]
async fn test_repeated_reads_are_served_from_cache() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p1", "Pro Book", 999.99)))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.storefront.products();
    let first = products.get("p1").await.into_result().unwrap();
    let second = products.get("p1").await;
    assert!(second.is_success());
    assert_eq!(second.data.unwrap(), first);
}

#[tokio::test]
async fn test_failed_reads_are_not_cached() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/products/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Product not found"})))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let products = ctx.storefront.products();
    for _ in 0..2 {
        let err = products.get("missing").await.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }
}

#[tokio::test]
async fn test_successful_update_invalidates_cache() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json()))
        .mount(&ctx.server)
        .await;
    ctx.storefront
        .auth()
        .login("user@example.com", "123456")
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            product_json("p1", "Pro Book", 999.99),
        ])))
        .expect(2)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p1", "Pro Book 2", 899.99)))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.storefront.products();
    let query = ProductQuery::default();
    products.list(&query).await.into_result().unwrap();
    products.list(&query).await.into_result().unwrap();

    let update = ProductUpdate {
        title: Some("Pro Book 2".to_string()),
        ..ProductUpdate::default()
    };
    products.update("p1", &update).await.into_result().unwrap();

    products.list(&query).await.into_result().unwrap();
}

#[tokio::test]
async fn test_remote_loader_filters_client_side() {
    let ctx = TestContext::start().await;
    let mut coat = product_json("c1", "Wool Coat", 199.99);
    coat["category"] = json!("fashion");
    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            product_json("p1", "Pro Book", 999.99),
            product_json("p2", "Air Book", 799.99),
            coat,
        ])))
        .mount(&ctx.server)
        .await;

    let loader = ctx.storefront.products_loader();
    let filter = ProductFilter::default().category("electronics").keyword("air");
    loader
        .load_remote(ctx.storefront.products(), &ProductQuery::default(), &filter)
        .await
        .unwrap();

    let snapshot = loader.resource().snapshot();
    assert!(!snapshot.is_loading);
    let ids: Vec<&str> = snapshot.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2"]);
}

#[tokio::test]
async fn test_concierge_answers_with_search_results() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .and(query_param("search", "laptop"))
        .and(query_param("size", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            product_json("p1", "Pro Book", 999.99),
            product_json("p2", "Air Book", 799.99),
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let concierge = ctx.storefront.concierge();
    let reply = concierge
        .send_message("Find me a laptop, please!", None)
        .await
        .unwrap();
    assert!(reply.text.starts_with("I've found some excellent laptop options for you!"));
    assert!(reply.text.contains("Pro Book, Air Book"));

    let session_id = concierge.state().session_id;
    let saved = ctx
        .storefront
        .sessions()
        .get_session_messages(&session_id)
        .unwrap();
    assert_eq!(saved.len(), 3);
}

#[tokio::test]
async fn test_concierge_falls_back_to_rules_when_search_fails() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    let concierge = ctx.storefront.concierge();
    concierge.open_session(SessionId::new("session_fallback"));
    let reply = concierge
        .send_message("looking for a new phone", None)
        .await
        .unwrap();
    assert!(reply.text.contains("Pixel 7"));
}
