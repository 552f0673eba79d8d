//! Payment API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::checkout::CheckoutEngine;
use crate::core::ServerState;
use crate::db::models::PaymentMethod;
use crate::payment::{GatewayOrderRequest, verify_signature};
use crate::security_log;
use crate::utils::{AppError, AppResult};

// 网关货币固定为 INR；金额以 paise (1/100) 计
const GATEWAY_CURRENCY: &str = "INR";

#[derive(Debug, Deserialize)]
pub struct SimpleCheckoutRequest {
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SimpleCheckoutResponse {
    pub message: String,
    pub order_id: String,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
}

/// POST /api/payment/simple-checkout - 货到付款结账
pub async fn simple_checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SimpleCheckoutRequest>,
) -> AppResult<Json<SimpleCheckoutResponse>> {
    let address = payload
        .shipping_address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::validation("Shipping address is required"))?;

    let engine = CheckoutEngine::new(state.db.clone());
    let order = engine.simple_checkout(&user.id, address).await?;

    let order_id = order
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    Ok(Json(SimpleCheckoutResponse {
        message: "Order placed successfully".to_string(),
        order_id,
        total_amount: order.total_amount,
        payment_method: order.payment_method,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    /// 前端拉起支付组件所需的 key id
    pub key: String,
}

/// POST /api/payment/create-order - 在网关创建支付订单
///
/// 金额 = round(购物车总额 × 100)，以最小货币单位传给网关。
pub async fn create_order(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CreateOrderResponse>> {
    let gateway = state
        .gateway
        .clone()
        .ok_or_else(|| AppError::service_unavailable("Payment gateway not configured"))?;
    let key_id = state
        .config
        .razorpay_key_id
        .clone()
        .ok_or_else(|| AppError::service_unavailable("Payment gateway not configured"))?;

    let engine = CheckoutEngine::new(state.db.clone());
    let validated = engine.validate_cart(&user.id).await?;

    let amount = (validated.total * 100.0).round() as i64;
    let request = GatewayOrderRequest {
        amount,
        currency: GATEWAY_CURRENCY.to_string(),
        receipt: format!("receipt_{}", chrono::Utc::now().timestamp_millis()),
        notes: serde_json::json!({
            "user_id": user.id.to_string(),
            "cart_items": validated.lines.len(),
        }),
    };

    let gateway_order = gateway
        .create_order(request)
        .await
        .map_err(|e| AppError::upstream(e.to_string()))?;

    Ok(Json(CreateOrderResponse {
        order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key: key_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub order_id: String,
    pub payment_id: String,
}

/// POST /api/payment/verify-payment - 验证网关回传签名并落单
///
/// 签名通过后购物车从头重新校验，订单以 `payment_status=paid` 落库。
pub async fn verify_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let secret = state
        .gateway_secret()
        .ok_or_else(|| AppError::service_unavailable("Payment gateway not configured"))?;

    if !verify_signature(
        secret,
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
    ) {
        security_log!(
            "WARN",
            "payment_signature_mismatch",
            user_id = user.id.to_string(),
            gateway_order_id = payload.razorpay_order_id.clone()
        );
        return Err(AppError::InvalidSignature);
    }

    let engine = CheckoutEngine::new(state.db.clone());
    let order = engine
        .commit_paid(
            &user.id,
            payload.razorpay_order_id,
            payload.razorpay_payment_id.clone(),
            payload.shipping_address,
        )
        .await?;

    let order_id = order
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    Ok(Json(VerifyPaymentResponse {
        message: "Payment verified and order placed".to_string(),
        order_id,
        payment_id: payload.razorpay_payment_id,
    }))
}
