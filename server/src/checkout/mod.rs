//! 结账模块
//!
//! 购物车 → 订单 的核心流程：共享的购物车校验加上三种提交变体
//! (直接下单、货到付款、网关支付确认)。

pub mod engine;

pub use engine::{CheckoutEngine, CheckoutError, ValidatedCart, ValidatedLine};
