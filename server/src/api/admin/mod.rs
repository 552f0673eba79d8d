//! Admin API 模块
//!
//! 后台管理：注册/登录、面板、商品 CRUD、订单管理。
//! 除 register/login 外的路由要求管理员令牌。

mod handler;

use axum::middleware as axum_middleware;
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::auth::middleware::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    let protected = Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/products/{id}",
            put(handler::update_product).delete(handler::delete_product),
        )
        .route("/orders", get(handler::list_orders))
        .route("/orders/{id}", put(handler::update_order))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .merge(protected)
}
