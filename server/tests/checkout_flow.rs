//! End-to-end tests for the cart → checkout → order workflow,
//! driving the full router over an in-memory database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use minimart_server::auth::JwtConfig;
use minimart_server::core::{Config, ServerState, build_app};
use minimart_server::db::DbService;
use minimart_server::db::models::ProductCreate;
use minimart_server::db::repository::ProductRepository;
use minimart_server::payment::{
    GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway, compute_signature,
};

const TEST_GATEWAY_SECRET: &str = "test_gateway_secret";

struct MockGateway;

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        Ok(GatewayOrder {
            id: "order_mock123".to_string(),
            amount: request.amount,
            currency: request.currency,
            status: "created".to_string(),
        })
    }
}

fn test_config() -> Config {
    Config {
        work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "minimart-server".to_string(),
            audience: "minimart-clients".to_string(),
        },
        environment: "test".to_string(),
        razorpay_key_id: Some("rzp_test_key".to_string()),
        razorpay_key_secret: Some(TEST_GATEWAY_SECRET.to_string()),
        admin_secret_key: Some("test-admin-secret".to_string()),
    }
}

async fn test_app() -> (Router, ServerState) {
    let db = DbService::memory().await.unwrap().db;
    let config = test_config();
    let jwt = Arc::new(minimart_server::JwtService::with_config(config.jwt.clone()));
    let state = ServerState::new(config, db, jwt, Some(Arc::new(MockGateway)));
    (build_app(&state), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/register",
            None,
            json!({"name": "Shopper", "email": email, "password": "hunter22"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn seed_product(state: &ServerState, name: &str, price: f64) -> String {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            description: String::new(),
            price,
            image: None,
            category: "test".to_string(),
            stock: Some(100),
        })
        .await
        .unwrap();
    product.id.unwrap().to_string()
}

#[tokio::test]
async fn cart_requires_authentication() {
    let (app, _state) = test_app().await;

    let (status, _) = send(&app, get("/api/cart", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state) = test_app().await;

    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn add_to_cart_merges_duplicates() {
    let (app, state) = test_app().await;
    let token = register(&app, "merge@example.com").await;
    let pid = seed_product(&state, "widget", 10.0).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/cart/add",
            Some(&token),
            json!({"productId": pid, "quantity": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add failed: {body}");
    assert_eq!(body["itemCount"], 1);

    let (status, body) = send(
        &app,
        post_json(
            "/api/cart/add",
            Some(&token),
            json!({"productId": pid, "quantity": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 3);
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_quantity_zero_removes_line() {
    let (app, state) = test_app().await;
    let token = register(&app, "zero@example.com").await;
    let pid = seed_product(&state, "widget", 10.0).await;

    send(
        &app,
        post_json("/api/cart/add", Some(&token), json!({"productId": pid})),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/cart/update",
            Some(&token),
            json!({"productId": pid, "quantity": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 0);
    assert!(body["cart"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn simple_checkout_end_to_end() {
    let (app, state) = test_app().await;
    let token = register(&app, "checkout@example.com").await;
    let a = seed_product(&state, "a", 10.0).await;
    let b = seed_product(&state, "b", 5.0).await;

    send(
        &app,
        post_json(
            "/api/cart/add",
            Some(&token),
            json!({"productId": a, "quantity": 2}),
        ),
    )
    .await;
    send(
        &app,
        post_json(
            "/api/cart/add",
            Some(&token),
            json!({"productId": b, "quantity": 1}),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/payment/simple-checkout",
            Some(&token),
            json!({"shipping_address": "42 Some Street"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "checkout failed: {body}");
    assert_eq!(body["total_amount"], 25.0);
    assert_eq!(body["payment_method"], "cod");

    // Cart is emptied after the order is persisted
    let (status, body) = send(&app, get("/api/cart", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());

    // The order shows up in the caller's list
    let (status, body) = send(&app, get("/api/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["total_amount"], 25.0);
    assert_eq!(orders[0]["shipping_address"], "42 Some Street");
}

#[tokio::test]
async fn simple_checkout_requires_address_and_items() {
    let (app, state) = test_app().await;
    let token = register(&app, "missing@example.com").await;

    // Empty cart
    let (status, _) = send(
        &app,
        post_json(
            "/api/payment/simple-checkout",
            Some(&token),
            json!({"shipping_address": "somewhere"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing address
    let pid = seed_product(&state, "widget", 1.0).await;
    send(
        &app,
        post_json("/api/cart/add", Some(&token), json!({"productId": pid})),
    )
    .await;
    let (status, _) = send(
        &app,
        post_json("/api/payment/simple-checkout", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_order_delete_looks_like_missing() {
    let (app, state) = test_app().await;
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;
    let pid = seed_product(&state, "widget", 10.0).await;

    send(
        &app,
        post_json("/api/cart/add", Some(&owner), json!({"productId": pid})),
    )
    .await;
    let (_, body) = send(
        &app,
        post_json(
            "/api/payment/simple-checkout",
            Some(&owner),
            json!({"shipping_address": "here"}),
        ),
    )
    .await;
    let order_id = body["order_id"].as_str().unwrap().to_string();

    // Someone else's delete and a missing-id delete are indistinguishable
    let (foreign_status, foreign_body) = send(
        &app,
        delete(&format!("/api/orders/{order_id}"), Some(&other)),
    )
    .await;
    let (missing_status, missing_body) = send(
        &app,
        delete("/api/orders/orders:doesnotexist", Some(&other)),
    )
    .await;

    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body["message"], missing_body["message"]);

    // The owner can still delete it
    let (status, _) = send(
        &app,
        delete(&format!("/api/orders/{order_id}"), Some(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn verify_payment_accepts_valid_signature_only() {
    let (app, state) = test_app().await;
    let token = register(&app, "pay@example.com").await;
    let pid = seed_product(&state, "widget", 12.5).await;

    send(
        &app,
        post_json(
            "/api/cart/add",
            Some(&token),
            json!({"productId": pid, "quantity": 2}),
        ),
    )
    .await;

    let (status, body) = send(&app, post_json("/api/payment/create-order", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK, "create-order failed: {body}");
    assert_eq!(body["amount"], 2500);
    let gateway_order_id = body["orderId"].as_str().unwrap().to_string();

    // Tampered signature is rejected and the cart is untouched
    let (status, _) = send(
        &app,
        post_json(
            "/api/payment/verify-payment",
            Some(&token),
            json!({
                "razorpay_order_id": gateway_order_id,
                "razorpay_payment_id": "pay_abc",
                "razorpay_signature": "deadbeef",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = send(&app, get("/api/cart", Some(&token))).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    // Valid signature commits the paid order and clears the cart
    let signature = compute_signature(TEST_GATEWAY_SECRET, &gateway_order_id, "pay_abc");
    let (status, body) = send(
        &app,
        post_json(
            "/api/payment/verify-payment",
            Some(&token),
            json!({
                "razorpay_order_id": gateway_order_id,
                "razorpay_payment_id": "pay_abc",
                "razorpay_signature": signature,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {body}");
    assert_eq!(body["paymentId"], "pay_abc");

    let (_, cart) = send(&app, get("/api/cart", Some(&token))).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (_, orders) = send(&app, get("/api/orders", Some(&token))).await;
    assert_eq!(orders[0]["payment_status"], "paid");
    assert_eq!(orders[0]["shipping_address"], "Not provided");
}

#[tokio::test]
async fn admin_surface_is_guarded() {
    let (app, _state) = test_app().await;
    let shopper = register(&app, "plain@example.com").await;

    // Shopper token is not an admin token
    let (status, _) = send(&app, get("/api/admin/dashboard", Some(&shopper))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Wrong secret key cannot mint admins
    let (status, _) = send(
        &app,
        post_json(
            "/api/admin/register",
            None,
            json!({"name": "Eve", "email": "eve@example.com", "password": "hunter22", "secretKey": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Correct secret key works, and the admin token opens the dashboard
    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/register",
            None,
            json!({"name": "Root", "email": "root@example.com", "password": "hunter22", "secretKey": "test-admin-secret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin register failed: {body}");
    let admin_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/api/admin/dashboard", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 1);
}
