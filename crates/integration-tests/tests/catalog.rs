//! Catalog client tests: listing, stock filtering, lookup, and the
//! read cache.

use rust_decimal::Decimal;

use cartwheel_client::StoreError;
use cartwheel_core::ProductId;
use cartwheel_integration_tests::{TestContext, sample_product};

#[tokio::test]
async fn list_and_stock_filter() {
    let ctx = TestContext::new().await;
    ctx.store.seed_product(sample_product("p1", "Mug", 120.0, 4));
    ctx.store.seed_product(sample_product("p2", "Bottle", 499.0, 0));

    let all = ctx.catalog.list_products().await.expect("list");
    assert_eq!(all.len(), 2);

    let in_stock = ctx.catalog.list_in_stock().await.expect("in stock");
    assert_eq!(in_stock.len(), 1);
    assert_eq!(in_stock[0].id, ProductId::new("p1"));
    assert!(in_stock[0].in_stock());
}

#[tokio::test]
async fn get_product_by_id() {
    let ctx = TestContext::new().await;
    ctx.store.seed_product(sample_product("p1", "Mug", 120.0, 4));

    let product = ctx
        .catalog
        .get_product(&ProductId::new("p1"))
        .await
        .expect("get");
    assert_eq!(product.name, "Mug");
    assert_eq!(product.price, Decimal::new(120, 0));
    assert_eq!(product.stock, 4);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let ctx = TestContext::new().await;

    let err = ctx
        .catalog
        .get_product(&ProductId::new("nope"))
        .await
        .expect_err("missing product");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn listing_is_served_from_cache_while_fresh() {
    let ctx = TestContext::new().await;
    ctx.store.seed_product(sample_product("p1", "Mug", 120.0, 4));

    let first = ctx.catalog.list_products().await.expect("first list");
    assert_eq!(first.len(), 1);

    // A product added behind the cache's back is invisible until the
    // TTL expires.
    ctx.store.seed_product(sample_product("p2", "Bottle", 499.0, 1));
    let second = ctx.catalog.list_products().await.expect("second list");
    assert_eq!(second.len(), 1, "within TTL the cached listing is served");
}
