//! Cart API 模块
//!
//! 购物车读取与三种变更 (add / remove / update)。全部需要登录。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart))
        .route("/add", post(handler::add_to_cart))
        .route("/remove", post(handler::remove_from_cart))
        .route("/update", post(handler::update_cart))
}
