//! Payment Gateway Client
//!
//! 支付网关抽象与 Razorpay HTTP 客户端。金额一律以最小货币单位
//! (paise) 传给网关。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 网关错误
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Gateway rejected the order: {0}")]
    Rejected(String),
}

/// 创建网关订单的请求
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrderRequest {
    /// 金额，最小货币单位 (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// 透传给网关的附加信息 (对账用)
    pub notes: serde_json::Value,
}

/// 网关返回的订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

/// 支付网关接口
///
/// 生产环境为 [`RazorpayClient`]；测试中可以用内存假实现替换。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: GatewayOrderRequest)
    -> Result<GatewayOrder, GatewayError>;
}

const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Razorpay HTTP 客户端 (Basic Auth: key_id / key_secret)
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
        }
    }

    /// 网关密钥 (签名验证也使用同一 secret)
    pub fn key_secret(&self) -> &str {
        &self.key_secret
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(RAZORPAY_ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Razorpay order creation failed: {} {}", status, body);
            return Err(GatewayError::Rejected(format!("{}: {}", status, body)));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| GatewayError::Request(format!("Malformed gateway response: {}", e)))
    }
}
