//! Integration tests for API endpoints.
//!
//! These tests drive the full router with fake services, without a
//! database.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sea_orm::DbErr;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use sockshop::api::create_router;
use sockshop::api::handlers::CustomerRoutes;
use sockshop::api::middleware::default_chain;
use sockshop::api::router::{compose, Mux, RouteError, Routes};
use sockshop::domain::{
    Address, Card, Customer, LinkDomain, NewAddress, NewCard, Password, Sock, SockOrder, SockQuery,
};
use sockshop::errors::{AppError, AppResult};
use sockshop::services::{CatalogueService, CustomerService, Health, HealthChecker, Registration};
use sockshop::AppState;

// =============================================================================
// Fake Services for Testing
// =============================================================================

struct FakeCatalogue {
    last_query: Mutex<Option<SockQuery>>,
    broken: bool,
}

impl FakeCatalogue {
    fn new() -> Self {
        Self {
            last_query: Mutex::new(None),
            broken: false,
        }
    }

    fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new()
        }
    }
}

fn argyle(id: Uuid) -> Sock {
    Sock {
        id,
        name: "Argyle".to_string(),
        description: "Diamonds".to_string(),
        image_urls: vec!["/catalogue/images/argyle.jpg".to_string()],
        price: 9.99,
        count: 4,
        tags: vec!["formal".to_string()],
    }
}

#[async_trait]
impl CatalogueService for FakeCatalogue {
    async fn list_socks(&self, query: SockQuery) -> AppResult<Vec<Sock>> {
        *self.last_query.lock().unwrap() = Some(query);
        Ok(vec![argyle(Uuid::new_v4())])
    }

    async fn count_socks(&self, tags: Vec<String>) -> AppResult<u64> {
        Ok(tags.len() as u64 + 1)
    }

    async fn get_sock(&self, id: Uuid) -> AppResult<Sock> {
        Err(AppError::NotFound.context(format!("get_sock(id={})", id)))
    }

    async fn tags(&self) -> AppResult<Vec<String>> {
        if self.broken {
            return Err(AppError::Database(DbErr::Custom(
                "dial tcp mysql:3306: connection refused".to_string(),
            )));
        }
        Ok(vec!["blue".to_string(), "formal".to_string()])
    }
}

/// Knows one customer, `ann` with password `secret`.
struct FakeCustomers {
    ann: Customer,
    cards: Mutex<Vec<Card>>,
    card_numbers: Mutex<HashSet<String>>,
}

impl FakeCustomers {
    fn new() -> Self {
        Self {
            ann: Customer {
                id: Uuid::new_v4(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: "ann@example.com".to_string(),
                username: "ann".to_string(),
                password: Password::new("secret").unwrap(),
                address_ids: BTreeSet::new(),
                card_ids: BTreeSet::new(),
            },
            cards: Mutex::new(Vec::new()),
            card_numbers: Mutex::new(HashSet::new()),
        }
    }

    fn known(&self, id: Uuid) -> AppResult<()> {
        if id == self.ann.id {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

fn duplicate(entity: &str) -> AppError {
    AppError::DuplicateEntry {
        entity: entity.to_string(),
        source: DbErr::Custom("Duplicate entry".to_string()),
    }
}

#[async_trait]
impl CustomerService for FakeCustomers {
    async fn login(&self, username: &str, password: &str) -> AppResult<Customer> {
        match username {
            "ann" if self.ann.password.verify(password) => Ok(self.ann.clone()),
            "ann" => Err(AppError::Unauthorized.context("login(username=ann)")),
            "boom" => Err(AppError::internal("store unavailable")),
            _ => Err(AppError::NotFound.context(format!("login(username={})", username))),
        }
    }

    async fn register(&self, registration: Registration) -> AppResult<Uuid> {
        match registration.username.as_str() {
            "ann" => Err(duplicate("user").context("register(username=ann)")),
            "explode" => Err(AppError::internal("disk full")),
            _ => Ok(Uuid::new_v4()),
        }
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        self.known(id)?;
        Ok(self.ann.clone())
    }

    async fn customer_cards(&self, customer_id: Uuid) -> AppResult<Vec<Card>> {
        self.known(customer_id)?;
        Ok(self.cards.lock().unwrap().clone())
    }

    async fn customer_addresses(&self, customer_id: Uuid) -> AppResult<Vec<Address>> {
        self.known(customer_id)?;
        Ok(Vec::new())
    }

    async fn get_card(&self, id: Uuid) -> AppResult<Card> {
        self.cards
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn get_address(&self, _id: Uuid) -> AppResult<Address> {
        Err(AppError::NotFound)
    }

    async fn create_card(&self, customer_id: Uuid, card: NewCard) -> AppResult<Uuid> {
        self.known(customer_id)?;
        if !self.card_numbers.lock().unwrap().insert(card.long_num.clone()) {
            return Err(duplicate("card").context("create_card"));
        }
        let id = Uuid::new_v4();
        self.cards.lock().unwrap().push(Card {
            id,
            long_num: card.long_num,
            expires: card.expires,
            ccv: card.ccv,
        });
        Ok(id)
    }

    async fn create_address(&self, customer_id: Uuid, _address: NewAddress) -> AppResult<Uuid> {
        self.known(customer_id)?;
        Err(AppError::internal("address table locked"))
    }
}

struct FakeHealth {
    broken: bool,
}

#[async_trait]
impl HealthChecker for FakeHealth {
    async fn check_health(&self) -> AppResult<Vec<Health>> {
        if self.broken {
            return Err(AppError::internal("checker crashed"));
        }
        Ok(vec![
            Health::new("sockshop", "OK", None),
            Health::new("sockshop-db", "err", Some("ping failed".to_string())),
        ])
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    catalogue: Arc<FakeCatalogue>,
    customers: Arc<FakeCustomers>,
}

fn test_app_with(catalogue: FakeCatalogue, health: FakeHealth) -> TestApp {
    let catalogue = Arc::new(catalogue);
    let customers = Arc::new(FakeCustomers::new());
    let state = AppState::new(
        catalogue.clone(),
        customers.clone(),
        Arc::new(health),
        LinkDomain::new("shop.test"),
    );

    TestApp {
        router: create_router(state).unwrap(),
        catalogue,
        customers,
    }
}

fn test_app() -> TestApp {
    test_app_with(FakeCatalogue::new(), FakeHealth { broken: false })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn login(credentials: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/login");
    if let Some(encoded) = credentials {
        builder = builder.header(header::AUTHORIZATION, format!("Basic {}", encoded));
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Customer Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_repeated_card_is_conflict() {
    let app = test_app();
    let uri = format!("/customers/{}/cards", app.customers.ann.id);
    let card = json!({"longNum": "4111111111111111", "expires": "04/28", "ccv": "123"});

    let (status, body) = send(&app.router, post_json(&uri, card.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());

    let (status, body) = send(&app.router, post_json(&uri, card)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"code": 409, "message": "card already registered"}));
}

#[tokio::test]
async fn test_card_for_unknown_customer_is_not_found() {
    let app = test_app();
    let uri = format!("/customers/{}/cards", Uuid::new_v4());
    let card = json!({"longNum": "5500000000000004", "expires": "01/30", "ccv": "999"});

    let (status, body) = send(&app.router, post_json(&uri, card)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");
}

#[tokio::test]
async fn test_cards_are_masked_with_links() {
    let app = test_app();
    let uri = format!("/customers/{}/cards", app.customers.ann.id);
    let card = json!({"longNum": "4111111111111111", "expires": "04/28", "ccv": "123"});
    let (_, created) = send(&app.router, post_json(&uri, card)).await;
    let card_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app.router, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    let listed = &body["cards"][0];
    assert_eq!(listed["longNum"], "************1111");
    assert_eq!(
        listed["_links"]["self"]["href"],
        format!("http://shop.test/cards/{}", card_id)
    );

    let (status, single) = send(&app.router, get(&format!("/cards/{}", card_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["longNum"], "************1111");
}

#[tokio::test]
async fn test_login_distinguishes_wrong_password_from_unknown_user() {
    let app = test_app();

    let (status, body) = send(&app.router, login(Some("YW5uOnNlY3JldA=="))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ann");
    assert!(body.get("password").is_none());

    let (status, body) = send(&app.router, login(Some("YW5uOmd1ZXNz"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user not authorised");

    let (status, body) = send(&app.router, login(Some("Z2hvc3Q6c2VjcmV0"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");

    let (status, _) = send(&app.router, login(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, login(Some("Ym9vbTp4"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "user login failed");
}

#[tokio::test]
async fn test_register_outcomes() {
    let app = test_app();
    let payload = |username: &str| {
        json!({
            "firstName": "New",
            "lastName": "Customer",
            "username": username,
            "password": "pw",
            "email": "new@example.com"
        })
    };

    let (status, body) = send(&app.router, post_json("/customers", payload("newbie"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());

    let (status, body) = send(&app.router, post_json("/customers", payload("ann"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "username or email already exists");

    let (status, body) = send(&app.router, post_json("/customers", payload(""))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "username is required");

    let (status, body) = send(&app.router, post_json("/customers", payload("explode"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "user registration failed");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .body(Body::from("{\"username\":"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": 400, "message": "json unmarshal failed"}));
}

#[tokio::test]
async fn test_customer_lookup() {
    let app = test_app();
    let id = app.customers.ann.id;

    let (status, body) = send(&app.router, get(&format!("/customers/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Ann");
    assert_eq!(
        body["_links"]["addresses"]["href"],
        format!("http://shop.test/customers/{}/addresses", id)
    );

    let (status, body) = send(&app.router, get("/customers/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");

    let (status, _) = send(&app.router, get(&format!("/customers/{}/addresses", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, get(&format!("/addresses/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "address not found");
}

#[tokio::test]
async fn test_address_store_failure_is_generic_500() {
    let app = test_app();
    let uri = format!("/customers/{}/addresses", app.customers.ann.id);
    let address = json!({"street": "High St", "number": "1", "country": "UK", "city": "Leeds", "postcode": "LS1"});

    let (status, body) = send(&app.router, post_json(&uri, address)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "adding address failed");
    assert!(!body.to_string().contains("locked"));
}

// =============================================================================
// Catalogue and Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_catalogue_query_parameters() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        get("/catalogue?tags=blue,formal&order=PRICE&page=2&size=5"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sock"][0]["name"], "Argyle");
    assert_eq!(body["sock"][0]["imageUrl"][0], "/catalogue/images/argyle.jpg");
    assert_eq!(body["sock"][0]["tag"], json!(["formal"]));

    let query = app.catalogue.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.tags, vec!["blue", "formal"]);
    assert_eq!(query.order, SockOrder::Price);
    assert_eq!(query.page.page, 2);
    assert_eq!(query.page.size, 5);
}

#[tokio::test]
async fn test_catalogue_size_and_tags() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/catalogue/size?tags=blue")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"size": 2}));

    let (status, body) = send(&app.router, get("/tags")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tags": ["blue", "formal"]}));
}

#[tokio::test]
async fn test_unknown_or_malformed_sock_is_not_found() {
    let app = test_app();

    for uri in [format!("/catalogue/{}", Uuid::new_v4()), "/catalogue/nope".to_string()] {
        let (status, body) = send(&app.router, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"code": 404, "message": "failed to get sock"}));
    }
}

#[tokio::test]
async fn test_unclassified_error_hides_cause() {
    let app = test_app_with(FakeCatalogue::broken(), FakeHealth { broken: false });

    let response = app.router.clone().oneshot(get("/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json;charset=UTF-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"code": 500, "message": "something went wrong"}));
}

#[tokio::test]
async fn test_health_reports_each_service() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let healths = body["healths"].as_array().unwrap();
    assert_eq!(healths.len(), 2);
    assert_eq!(healths[1]["service"], "sockshop-db");
    assert_eq!(healths[1]["status"], "err");
    assert_eq!(healths[1]["details"], "ping failed");
}

#[tokio::test]
async fn test_failing_health_checker_is_500() {
    let app = test_app_with(FakeCatalogue::new(), FakeHealth { broken: true });

    let (status, _) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Routing Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = app.router.clone().oneshot(get("/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_composing_a_table_twice_conflicts() {
    let customers = CustomerRoutes::new(Arc::new(FakeCustomers::new()), LinkDomain::new("x"));
    let routes = compose(&[&customers as &dyn Routes, &customers]);

    let err = Mux::new().install(routes, &default_chain()).unwrap_err();

    assert!(matches!(err, RouteError::Conflict { ref pattern, .. } if pattern == "/login"));
}
