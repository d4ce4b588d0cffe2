//! State that survives a restart through the file store.

#![allow(clippy::unwrap_used)]

use baiyit_core::{Price, ProductId, SessionId};
use baiyit_integration_tests::config_for;
use baiyit_storefront::models::LineItem;
use baiyit_storefront::storage::{FileStore, KeyValueStore};
use baiyit_storefront::{Storefront, StorefrontConfig};

fn config(dir: &tempfile::TempDir) -> StorefrontConfig {
    let mut config = config_for("http://127.0.0.1:9");
    config.state_dir = dir.path().to_path_buf();
    config
}

fn item(id: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::from_cents(cents),
        image: String::new(),
        quantity,
    }
}

#[test]
fn test_cart_and_bag_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storefront = Storefront::open(config(&dir)).unwrap();
        storefront.cart().add_item(item("p1", 1_000, 1));
        storefront.cart().add_item(item("p1", 1_000, 2));
        storefront.bag().add_item(item("p2", 499, 4));
    }

    let storefront = Storefront::open(config(&dir)).unwrap();
    let cart = storefront.cart().items();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(storefront.cart().total(), Price::from_cents(3_000));
    assert_eq!(storefront.bag().total(), Price::from_cents(1_996));
    assert!(dir.path().join("storage.json").exists());
}

#[test]
fn test_opening_the_storefront_leaves_no_sessions_behind() {
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let storefront = Storefront::open(config(&dir)).unwrap();
        assert!(storefront.cart().items().is_empty());
        assert_eq!(storefront.concierge().messages().len(), 1);
    }

    let path = config(&dir).storage_path();
    let entries: std::collections::BTreeMap<String, String> = match std::fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap(),
        Err(_) => std::collections::BTreeMap::new(),
    };
    assert!(entries.keys().all(|key| !key.starts_with("session_")));
}

#[test]
fn test_corrupt_cart_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = config(&dir).storage_path();
    FileStore::open(&path).unwrap().set("cart", "{not json").unwrap();

    let storefront = Storefront::open(config(&dir)).unwrap();
    assert!(storefront.cart().items().is_empty());

    storefront.cart().add_item(item("p1", 100, 1));
    let reopened = FileStore::open(&path).unwrap();
    assert!(reopened.get("cart").unwrap().unwrap().starts_with('['));
}

#[tokio::test]
async fn test_assistant_transcript_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storefront = Storefront::open(config(&dir)).unwrap();
        let reply = storefront
            .assistant()
            .send_message("Can you compare two laptops?")
            .await
            .unwrap();
        assert!(reply.text.contains("laptop"));
    }

    let storefront = Storefront::open(config(&dir)).unwrap();
    let messages = storefront.assistant().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "Can you compare two laptops?");
    assert!(messages[1].is_from_ai());
}

#[tokio::test]
async fn test_concierge_session_can_be_resumed() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionId::new("session_resume");

    {
        let storefront = Storefront::open(config(&dir)).unwrap();
        storefront.concierge().open_session(session.clone());
        storefront
            .concierge()
            .send_message("", Some("photo.jpg".to_string()))
            .await
            .unwrap();
    }

    let storefront = Storefront::open(config(&dir)).unwrap();
    let saved = storefront.sessions().get_session_messages(&session).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0].id.as_str(), "1");
    assert_eq!(saved[1].image.as_deref(), Some("photo.jpg"));
}
