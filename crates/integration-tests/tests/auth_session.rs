//! Identity session tests: register, login, logout, the suspension
//! watch, and cross-context mirroring.

use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use cartwheel_client::{AuthError, SessionEvent};
use cartwheel_core::Email;
use cartwheel_integration_tests::{TestContext, sample_user, wait_for};

fn email(s: &str) -> Email {
    Email::parse(s).expect("test email")
}

#[tokio::test]
async fn register_creates_account_and_signs_in() {
    let ctx = TestContext::new().await;

    let user = ctx
        .session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");

    assert!(user.cart.is_empty() && user.wishlist.is_empty() && user.orders.is_empty());
    assert!(!user.is_block);
    assert!(!user.is_admin());

    // Active snapshot, durable mirror, and remote record all agree.
    assert_eq!(ctx.session.current_user().expect("active").id, user.id);
    assert_eq!(ctx.cache.get().expect("cached").id, user.id);
    let stored = ctx.store.user(user.id.as_str()).expect("stored");
    assert_eq!(stored["email"], json!("asha@example.com"));
}

#[tokio::test]
async fn register_duplicate_email_rejected() {
    let ctx = TestContext::new().await;
    ctx.store
        .seed_user(sample_user("Asha", "asha@example.com", "secret12"));

    let err = ctx
        .session
        .register("Imposter", &email("asha@example.com"), "other")
        .await
        .expect_err("duplicate must fail");

    assert!(matches!(err, AuthError::DuplicateAccount));
    assert!(ctx.session.current_user().is_none());
}

#[tokio::test]
async fn login_credential_matrix() {
    let ctx = TestContext::new().await;
    ctx.store.seed_user(sample_user("A", "a@x.com", "secret12"));

    let err = ctx
        .session
        .login(&email("nobody@x.com"), "secret12")
        .await
        .expect_err("unknown email");
    assert!(matches!(err, AuthError::AccountNotFound));

    let err = ctx
        .session
        .login(&email("a@x.com"), "wrong")
        .await
        .expect_err("wrong password");
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(ctx.session.current_user().is_none());

    let user = ctx
        .session
        .login(&email("a@x.com"), "secret12")
        .await
        .expect("correct credentials");
    assert!(user.cart.is_empty() && user.wishlist.is_empty() && user.orders.is_empty());
    assert_eq!(ctx.session.current_user().expect("active").id, user.id);
}

#[tokio::test]
async fn login_blocked_account_rejected() {
    let ctx = TestContext::new().await;
    let mut doc = sample_user("B", "blocked@x.com", "pw");
    doc["isBlock"] = json!(true);
    ctx.store.seed_user(doc);

    let err = ctx
        .session
        .login(&email("blocked@x.com"), "pw")
        .await
        .expect_err("blocked account");
    assert!(matches!(err, AuthError::AccountSuspended));
}

#[tokio::test]
async fn logout_is_idempotent() {
    let ctx = TestContext::new().await;
    ctx.session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");

    ctx.session.logout();
    assert!(ctx.session.current_user().is_none());
    assert!(ctx.cache.get().is_none());

    // Second logout is a no-op, not an error.
    ctx.session.logout();
    assert!(ctx.session.current_user().is_none());
}

#[tokio::test]
async fn suspension_watch_forces_logout() {
    let ctx = TestContext::new().await;
    let user = ctx
        .session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");
    let mut events = ctx.session.events();

    // An admin blocks the account out-of-band.
    ctx.store
        .update_user(user.id.as_str(), |u| u["isBlock"] = json!(true));

    let event = timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("suspension within one interval")
        .expect("event channel open");
    assert_eq!(event, SessionEvent::Suspended);

    assert!(ctx.session.current_user().is_none());
    assert!(ctx.cache.get().is_none());
}

#[tokio::test]
async fn watch_errors_are_swallowed() {
    let ctx = TestContext::new().await;
    let user = ctx
        .session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");

    // Make every status check fail: the record vanishes remotely.
    ctx.store
        .update_user(user.id.as_str(), |u| u["id"] = json!("moved"));

    // Several polling intervals pass; availability wins and the session
    // stays up.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(ctx.session.current_user().is_some());
}

#[tokio::test]
async fn another_tab_resumes_from_cache() {
    let ctx = TestContext::new().await;
    let user = ctx
        .session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");

    // A session constructed over the same slot starts signed in.
    let tab2 = ctx.another_tab();
    assert_eq!(tab2.current_user().expect("resumed").id, user.id);
}

#[tokio::test]
async fn cross_tab_logout_mirrors() {
    let ctx = TestContext::new().await;
    ctx.session
        .register("Asha", &email("asha@example.com"), "secret12")
        .await
        .expect("register");
    let tab2 = ctx.another_tab();
    assert!(tab2.current_user().is_some());

    ctx.session.logout();
    wait_for("tab2 mirrors the logout", || tab2.current_user().is_none()).await;
}

#[tokio::test]
async fn cross_tab_login_mirrors() {
    let ctx = TestContext::new().await;
    ctx.store.seed_user(sample_user("A", "a@x.com", "secret12"));
    let tab2 = ctx.another_tab();
    assert!(tab2.current_user().is_none());

    let user = ctx
        .session
        .login(&email("a@x.com"), "secret12")
        .await
        .expect("login");

    wait_for("tab2 adopts the sign-in", || {
        tab2.current_user().is_some_and(|u| u.id == user.id)
    })
    .await;
}
