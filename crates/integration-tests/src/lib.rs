//! Integration test support for Cartwheel.
//!
//! [`MockStore`] is an in-process stand-in for the remote document
//! store, with the same shape the client is written against: collection
//! endpoints, ad-hoc `?email=` filtering, create with server-assigned
//! ids, whole-document `PUT`, and no transactions. It also counts `PUT`s
//! (so tests can assert that a no-op mutation made no network call) and
//! can be told to fail them (to exercise persist-failure paths).
//!
//! [`TestContext`] wires a full client stack - config, directory,
//! catalog, session cache in a temp directory, identity session with a
//! fast poll interval - against one `MockStore`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};

use cartwheel_client::{
    CartLedger, CatalogClient, ClientConfig, IdentitySession, OrderLedger, SessionCache,
    UserDirectoryClient, WishlistLedger,
};

/// Poll interval used in tests; short enough that suspension detection
/// is observable within a one-second timeout.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// MockStore
// ============================================================================

#[derive(Default)]
struct StoreState {
    users: Mutex<Vec<Value>>,
    products: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    put_count: AtomicUsize,
    fail_puts: AtomicBool,
}

impl StoreState {
    fn users(&self) -> MutexGuard<'_, Vec<Value>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn products(&self) -> MutexGuard<'_, Vec<Value>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process document store.
pub struct MockStore {
    addr: SocketAddr,
    state: Arc<StoreState>,
}

impl MockStore {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind (test environment problem).
    pub async fn spawn() -> Self {
        let state = Arc::new(StoreState::default());

        let app = Router::new()
            .route("/users", get(list_users).post(create_user))
            .route(
                "/users/{id}",
                get(get_user).put(replace_user).delete(delete_user),
            )
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock store");
        let addr = listener.local_addr().expect("mock store addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL for client configuration.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a user document directly, assigning an id. Returns the id.
    pub fn seed_user(&self, mut user: Value) -> String {
        let id = format!("u{}", self.state.next_id.fetch_add(1, Ordering::Relaxed));
        user["id"] = json!(id);
        self.state.users().push(user);
        id
    }

    /// Insert a product document directly.
    pub fn seed_product(&self, product: Value) {
        self.state.products().push(product);
    }

    /// Read a user document directly (what the store currently holds).
    #[must_use]
    pub fn user(&self, id: &str) -> Option<Value> {
        self.state
            .users()
            .iter()
            .find(|u| u["id"] == json!(id))
            .cloned()
    }

    /// Mutate a user document out-of-band (e.g. an admin in another
    /// process flipping `isBlock`).
    pub fn update_user(&self, id: &str, f: impl FnOnce(&mut Value)) {
        if let Some(user) = self
            .state
            .users()
            .iter_mut()
            .find(|u| u["id"] == json!(id))
        {
            f(user);
        }
    }

    /// Number of `PUT /users/{id}` calls served so far.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.state.put_count.load(Ordering::Relaxed)
    }

    /// Make subsequent `PUT`s fail with a 500.
    pub fn set_fail_puts(&self, fail: bool) {
        self.state.fail_puts.store(fail, Ordering::Relaxed);
    }
}

async fn list_users(
    State(state): State<Arc<StoreState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let users = state.users();
    let filtered: Vec<Value> = match params.get("email") {
        Some(email) => users
            .iter()
            .filter(|u| u["email"] == json!(email))
            .cloned()
            .collect(),
        None => users.clone(),
    };
    axum::Json(filtered).into_response()
}

async fn get_user(State(state): State<Arc<StoreState>>, Path(id): Path<String>) -> Response {
    match state.users().iter().find(|u| u["id"] == json!(id)) {
        Some(user) => axum::Json(user.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_user(
    State(state): State<Arc<StoreState>>,
    axum::Json(mut user): axum::Json<Value>,
) -> Response {
    let id = format!("u{}", state.next_id.fetch_add(1, Ordering::Relaxed));
    user["id"] = json!(id);
    state.users().push(user.clone());
    (StatusCode::CREATED, axum::Json(user)).into_response()
}

async fn replace_user(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
    axum::Json(mut user): axum::Json<Value>,
) -> Response {
    if state.fail_puts.load(Ordering::Relaxed) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    state.put_count.fetch_add(1, Ordering::Relaxed);

    user["id"] = json!(id);
    let mut users = state.users();
    match users.iter_mut().find(|u| u["id"] == json!(id)) {
        Some(slot) => {
            *slot = user.clone();
            axum::Json(user).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_user(State(state): State<Arc<StoreState>>, Path(id): Path<String>) -> Response {
    let mut users = state.users();
    let before = users.len();
    users.retain(|u| u["id"] != json!(id));
    if users.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        axum::Json(json!({})).into_response()
    }
}

async fn list_products(State(state): State<Arc<StoreState>>) -> Response {
    axum::Json(state.products().clone()).into_response()
}

async fn get_product(State(state): State<Arc<StoreState>>, Path(id): Path<String>) -> Response {
    match state.products().iter().find(|p| p["id"] == json!(id)) {
        Some(product) => axum::Json(product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// TestContext
// ============================================================================

/// A full client stack wired against one [`MockStore`].
pub struct TestContext {
    pub store: MockStore,
    pub config: ClientConfig,
    pub directory: UserDirectoryClient,
    pub catalog: CatalogClient,
    pub cache: SessionCache,
    pub session: IdentitySession,
    session_dir: tempfile::TempDir,
}

impl TestContext {
    /// Spawn a store and wire a client stack against it.
    ///
    /// # Panics
    ///
    /// Panics on fixture setup failure.
    pub async fn new() -> Self {
        let store = MockStore::spawn().await;
        let session_dir = tempfile::tempdir().expect("session temp dir");

        let mut config = ClientConfig::new(&store.url()).expect("store url");
        config.session_file = session_dir.path().join("session.json");
        config.poll_interval = TEST_POLL_INTERVAL;

        let directory = UserDirectoryClient::new(&config);
        let catalog = CatalogClient::new(&config);
        let cache = SessionCache::new(config.session_file.clone());
        let session = IdentitySession::new(directory.clone(), cache.clone(), config.poll_interval);

        Self {
            store,
            config,
            directory,
            catalog,
            cache,
            session,
            session_dir,
        }
    }

    /// A second session over the **same** cache file and slot - the
    /// same-browser, another-tab analogue.
    #[must_use]
    pub fn another_tab(&self) -> IdentitySession {
        IdentitySession::new(
            self.directory.clone(),
            self.cache.clone(),
            self.config.poll_interval,
        )
    }

    /// A second session with its **own** cache slot - the
    /// different-browser analogue. No cross-context mirroring happens
    /// between this session and the main one.
    #[must_use]
    pub fn another_browser(&self) -> IdentitySession {
        let cache = SessionCache::new(self.session_dir.path().join("session-2.json"));
        IdentitySession::new(self.directory.clone(), cache, self.config.poll_interval)
    }

    pub fn cart(&self) -> CartLedger {
        CartLedger::new(self.session.clone(), self.directory.clone())
    }

    pub fn wishlist(&self) -> WishlistLedger {
        WishlistLedger::new(self.session.clone(), self.directory.clone())
    }

    pub fn orders(&self) -> OrderLedger {
        OrderLedger::new(self.session.clone(), self.directory.clone())
    }
}

/// Poll until `predicate` holds, panicking after two seconds.
///
/// Used where the observable change happens on a background task (the
/// suspension watch, the cross-context cache listener).
///
/// # Panics
///
/// Panics if the condition is not reached within the deadline.
pub async fn wait_for(what: &str, predicate: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !predicate() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "not reached within 2s: {what}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

// ============================================================================
// Document builders
// ============================================================================

/// A user document as the store would hold it.
#[must_use]
pub fn sample_user(name: &str, email: &str, password: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": password,
        "role": "User",
        "isBlock": false,
        "createdAt": "2024-06-01T10:00:00.000Z",
        "cart": [],
        "wishlist": [],
        "orders": []
    })
}

/// A product document as the catalog would hold it.
#[must_use]
pub fn sample_product(id: &str, name: &str, price: f64, stock: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "general",
        "price": price,
        "stock": stock,
        "image": format!("https://img.example/{id}.jpg"),
        "description": ""
    })
}

/// An order document inside a user's history.
#[must_use]
pub fn sample_order(order_id: &str, status: &str, total: f64) -> Value {
    json!({
        "orderId": order_id,
        "items": [
            {"productId": "p1", "name": "Mug", "price": total, "image": "m.jpg", "quantity": 1}
        ],
        "totalAmount": total,
        "paymentMethod": "COD",
        "paymentStatus": "SUCCESS",
        "shippingAddress": {
            "name": "Asha", "phone": "9999999999", "street": "1 MG Rd",
            "city": "Kochi", "state": "KL", "pincode": "682001"
        },
        "orderStatus": status,
        "createdAt": "2024-06-01T10:00:00.000Z"
    })
}

/// A shipping address for checkout calls.
#[must_use]
pub fn sample_address() -> cartwheel_core::ShippingAddress {
    cartwheel_core::ShippingAddress {
        name: "Asha".to_owned(),
        phone: "9999999999".to_owned(),
        street: "1 MG Rd".to_owned(),
        city: "Kochi".to_owned(),
        state: "KL".to_owned(),
        pincode: "682001".to_owned(),
    }
}
