//! Order Model
//!
//! 订单是结算时的快照：商品引用、数量和下单时单价一经写入不再变化。
//! 三个结算入口（直接下单 / 货到付款 / 网关支付）写入同一种订单结构，
//! 所有读取方（用户订单列表、后台面板、后台订单视图）读同一个 total_amount。

use super::serde_helpers;
use super::{Product, ProductId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// How the order is paid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cod,
    Online,
}

/// Payment lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Completed,
    Failed,
}

/// Fulfilment lifecycle (mutated only by the admin surface)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmed,
    Processing,
    Shipped,
    Delivered,
}

/// Snapshot of one purchased line: product ref, quantity, price at purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: ProductId,
    pub quantity: i64,
    /// Unit price at checkout time — never follows later catalog changes
    pub price: f64,
}

/// Order entity — immutable snapshot except for the status fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,
    #[serde(default = "default_order_status")]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<String>,
    /// Gateway order/payment identifiers (online payments only)
    #[serde(default)]
    pub gateway_order_id: Option<String>,
    #[serde(default)]
    pub gateway_payment_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Cod
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}

fn default_order_status() -> OrderStatus {
    OrderStatus::Confirmed
}

/// Update order payload (admin: status transitions only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Order line with the product resolved for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
    pub product: Product,
    pub quantity: i64,
    pub price: f64,
}

/// Order for list views: stale product references filtered out and the
/// total recomputed from the surviving snapshot lines. The stored order
/// is never mutated by this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<OrderLineView>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub shipping_address: Option<String>,
    pub created_at: i64,
}
