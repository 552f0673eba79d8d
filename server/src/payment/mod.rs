//! 支付模块
//!
//! 网关客户端抽象与签名验证。

pub mod gateway;
pub mod verify;

pub use gateway::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway, RazorpayClient};
pub use verify::{compute_signature, verify_signature};
