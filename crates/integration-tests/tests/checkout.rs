//! Cart checkout against a mock backend.

#![allow(clippy::unwrap_used)]

use baiyit_core::{Price, ProductId};
use baiyit_integration_tests::{TestContext, auth_json, order_json};
use baiyit_storefront::models::LineItem;
use baiyit_storefront::storage::KeyValueStore;
use baiyit_storefront::{StorefrontError, ValidationError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn item(id: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::from_cents(cents),
        image: String::new(),
        quantity,
    }
}

async fn sign_in(ctx: &TestContext) {
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
}

async fn expect_no_orders(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_empty_cart_is_rejected_before_any_request() {
    let ctx = TestContext::start().await;
    sign_in(&ctx).await;
    expect_no_orders(&ctx).await;
    let mut toasts = ctx.storefront.toaster().subscribe();

    let err = ctx.storefront.checkout().await.unwrap_err();
    assert!(matches!(
        err,
        StorefrontError::Validation(ValidationError::CartEmpty)
    ));
    assert_eq!(toasts.recv().await.unwrap().message, "Your cart is empty");
}

#[tokio::test]
async fn test_signed_out_checkout_is_rejected_before_any_request() {
    let ctx = TestContext::start().await;
    expect_no_orders(&ctx).await;
    ctx.storefront.cart().add_item(item("p1", 1_000, 1));

    let err = ctx.storefront.checkout().await.unwrap_err();
    assert_eq!(err.to_string(), "Please log in to checkout");
    assert_eq!(ctx.storefront.cart().item_count(), 1);
}

#[tokio::test]
async fn test_checkout_posts_lines_and_clears_cart() {
    let ctx = TestContext::start().await;
    sign_in(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(header("authorization", "Bearer access-abc"))
        .and(body_json(json!({
            "items": [
                {"product_id": "p1", "quantity": 3},
                {"product_id": "p2", "quantity": 1}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json("order-1", "Processing")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let cart = ctx.storefront.cart();
    cart.add_item(item("p1", 1_000, 1));
    cart.add_item(item("p1", 1_000, 2));
    cart.add_item(item("p2", 250, 1));
    assert_eq!(cart.total(), Price::from_cents(3_250));

    let order = ctx.storefront.checkout().await.unwrap();
    assert_eq!(order.id.as_str(), "order-1");
    assert!(cart.items().is_empty());
    assert!(!cart.is_open());
    assert_eq!(ctx.store.get("cart").unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_backend_rejection_keeps_cart() {
    let ctx = TestContext::start().await;
    sign_in(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Product p1 is out of stock"})),
        )
        .mount(&ctx.server)
        .await;

    ctx.storefront.cart().add_item(item("p1", 1_000, 1));
    let mut toasts = ctx.storefront.toaster().subscribe();

    let err = ctx.storefront.checkout().await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(ctx.storefront.cart().item_count(), 1);
    assert_eq!(
        toasts.recv().await.unwrap().message,
        "Product p1 is out of stock"
    );
}
