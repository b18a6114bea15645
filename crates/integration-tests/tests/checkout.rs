//! Checkout tests: placing orders, the atomic append-and-clear replace,
//! history lookups, and failure atomicity.

use rust_decimal::Decimal;
use serde_json::json;

use cartwheel_client::LedgerError;
use cartwheel_core::{
    Email, OrderStatus, PaymentMethod, PaymentStatus, Product, ProductId, UserRecord,
};
use cartwheel_integration_tests::{TestContext, sample_address};

fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category: "general".to_owned(),
        price: Decimal::new(price, 0),
        original_price: None,
        stock: 10,
        image: format!("{id}.jpg"),
        description: String::new(),
    }
}

async fn sign_in(ctx: &TestContext) -> UserRecord {
    ctx.session
        .register("Asha", &Email::parse("asha@example.com").unwrap(), "pw")
        .await
        .expect("register")
}

#[tokio::test]
async fn checkout_places_order_and_clears_cart() {
    let ctx = TestContext::new().await;
    let user = sign_in(&ctx).await;
    let cart = ctx.cart();
    let orders = ctx.orders();

    cart.add_line(&product("p1", 100), 2).await.expect("add");
    cart.add_line(&product("p2", 250), 1).await.expect("add");

    let order = orders
        .place_cart_order(PaymentMethod::Cod, sample_address())
        .await
        .expect("checkout");

    assert!(order.order_id.starts_with("ORD_"));
    assert_eq!(order.total_amount, Decimal::new(450, 0));
    assert_eq!(order.order_status, OrderStatus::Placed);
    assert_eq!(order.payment_status, PaymentStatus::Success);
    assert_eq!(order.items.len(), 2);

    // Cart cleared locally and in the store, order appended, one replace.
    assert!(cart.lines().is_empty());
    let doc = ctx.store.user(user.id.as_str()).expect("stored");
    assert_eq!(doc["cart"], json!([]));
    assert_eq!(doc["orders"].as_array().map(Vec::len), Some(1));
    assert_eq!(doc["orders"][0]["orderId"], json!(order.order_id));
    assert_eq!(doc["orders"][0]["paymentMethod"], json!("COD"));
    assert_eq!(doc["orders"][0]["paymentStatus"], json!("SUCCESS"));
}

#[tokio::test]
async fn empty_cart_checkout_rejected_without_network() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let orders = ctx.orders();
    let before = ctx.store.put_count();

    let err = orders
        .place_cart_order(PaymentMethod::Upi, sample_address())
        .await
        .expect_err("empty cart");
    assert!(matches!(err, LedgerError::EmptyOrder));
    assert_eq!(ctx.store.put_count(), before);
}

#[tokio::test]
async fn signed_out_checkout_rejected() {
    let ctx = TestContext::new().await;
    let orders = ctx.orders();

    let err = orders
        .place_order(
            vec![cartwheel_core::CartLine::from_product(&product("p1", 10), 1)],
            PaymentMethod::Cod,
            sample_address(),
        )
        .await
        .expect_err("nobody signed in");
    assert!(matches!(err, LedgerError::EmptyOrder));
    assert_eq!(ctx.store.put_count(), 0);
}

#[tokio::test]
async fn buy_now_bypasses_cart_but_still_clears_it() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let cart = ctx.cart();
    let orders = ctx.orders();

    cart.add_line(&product("p1", 100), 1).await.expect("add");

    let order = orders
        .buy_now(&product("p9", 999), 2, PaymentMethod::Upi, sample_address())
        .await
        .expect("buy now");

    assert_eq!(order.total_amount, Decimal::new(1998, 0));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].product_id, ProductId::new("p9"));
    // Placement clears the cart even though the purchase bypassed it.
    assert!(cart.lines().is_empty());
}

#[tokio::test]
async fn buy_now_zero_quantity_rejected() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let orders = ctx.orders();

    let err = orders
        .buy_now(&product("p1", 100), 0, PaymentMethod::Cod, sample_address())
        .await
        .expect_err("zero quantity");
    assert!(matches!(err, LedgerError::InvalidQuantity(0)));
}

#[tokio::test]
async fn persist_failure_keeps_cart_and_history() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let cart = ctx.cart();
    let orders = ctx.orders();

    cart.add_line(&product("p1", 100), 2).await.expect("add");
    ctx.store.set_fail_puts(true);

    let err = orders
        .place_cart_order(PaymentMethod::Cod, sample_address())
        .await
        .expect_err("store down");
    assert!(matches!(err, LedgerError::OrderPlacementFailed(_)));

    // No false success anywhere: cart intact, no phantom order.
    assert_eq!(cart.lines().len(), 1);
    assert!(orders.order_history().is_empty());
}

#[tokio::test]
async fn history_and_lookup() {
    let ctx = TestContext::new().await;
    sign_in(&ctx).await;
    let orders = ctx.orders();

    let first = orders
        .buy_now(&product("p1", 100), 1, PaymentMethod::Cod, sample_address())
        .await
        .expect("first order");
    let second = orders
        .buy_now(&product("p2", 50), 1, PaymentMethod::Upi, sample_address())
        .await
        .expect("second order");

    let history = orders.order_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].order_id, first.order_id, "append order preserved");
    assert_eq!(history[1].order_id, second.order_id);

    let found = orders.order_by_id(&second.order_id).expect("lookup");
    assert_eq!(found.payment_method, PaymentMethod::Upi);
    assert!(orders.order_by_id("ORD_0_XXXXX").is_none());
}
