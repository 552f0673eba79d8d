//! Payment API 模块
//!
//! 货到付款结账与两段式在线支付 (create-order / verify-payment)。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payment", payment_routes())
}

fn payment_routes() -> Router<ServerState> {
    Router::new()
        .route("/simple-checkout", post(handler::simple_checkout))
        .route("/create-order", post(handler::create_order))
        .route("/verify-payment", post(handler::verify_payment))
}
