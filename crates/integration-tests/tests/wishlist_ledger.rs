//! Wishlist ledger tests: presence toggling and idempotence.

use rust_decimal::Decimal;
use serde_json::json;

use cartwheel_core::{Email, Product, ProductId};
use cartwheel_integration_tests::TestContext;

fn product(id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category: "general".to_owned(),
        price: Decimal::new(199, 0),
        original_price: None,
        stock: 5,
        image: format!("{id}.jpg"),
        description: String::new(),
    }
}

async fn sign_in(ctx: &TestContext) {
    ctx.session
        .register("Asha", &Email::parse("asha@example.com").unwrap(), "pw")
        .await
        .expect("register");
}

#[tokio::test]
async fn toggle_round_trip() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let wishlist = ctx.wishlist();
    let mug = product("p1");

    let present = wishlist.toggle(&mug).await.expect("toggle on");
    assert!(present);
    assert!(wishlist.contains(&mug.id));
    assert_eq!(wishlist.items().len(), 1);

    let present = wishlist.toggle(&mug).await.expect("toggle off");
    assert!(!present);
    assert!(!wishlist.contains(&mug.id));
    assert!(wishlist.items().is_empty());
}

#[tokio::test]
async fn add_is_idempotent_without_network() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let wishlist = ctx.wishlist();
    let mug = product("p1");

    wishlist.add_item(&mug).await.expect("add");
    let after_first = ctx.store.put_count();

    wishlist.add_item(&mug).await.expect("add again");
    assert_eq!(wishlist.items().len(), 1, "at most one entry per product");
    assert_eq!(
        ctx.store.put_count(),
        after_first,
        "already-present add makes no network call"
    );
}

#[tokio::test]
async fn remove_absent_skips_network() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let wishlist = ctx.wishlist();
    let before = ctx.store.put_count();

    wishlist
        .remove_item(&ProductId::new("nope"))
        .await
        .expect("remove absent");
    assert_eq!(ctx.store.put_count(), before);
}

#[tokio::test]
async fn wishlist_persists_to_store() {
    let ctx = TestContext::new().await;
    let user = ctx
        .session
        .register("Asha", &Email::parse("asha@example.com").unwrap(), "pw")
        .await
        .expect("register");
    let wishlist = ctx.wishlist();

    wishlist.add_item(&product("p7")).await.expect("add");

    let doc = ctx.store.user(user.id.as_str()).expect("stored");
    assert_eq!(doc["wishlist"][0]["productId"], json!("p7"));
    assert_eq!(doc["wishlist"][0]["price"], json!(199.0));
}

#[tokio::test]
async fn signed_out_toggle_reports_absent() {
    let ctx = TestContext::new().await;
    let wishlist = ctx.wishlist();

    let present = wishlist.toggle(&product("p1")).await.expect("no-op");
    assert!(!present);
    assert_eq!(ctx.store.put_count(), 0);
}
