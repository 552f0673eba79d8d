//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::checkout::CheckoutEngine;
use crate::core::ServerState;
use crate::db::models::{Order, OrderLineView, OrderView};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

/// 把存储的订单转成展示视图：已下架商品的行被过滤，总额按存活的
/// 快照行重新计算。存储的订单本身不被修改。
pub(crate) async fn order_view(products: &ProductRepository, order: Order) -> AppResult<OrderView> {
    let mut items = Vec::with_capacity(order.items.len());
    for item in order.items {
        if let Some(product) = products.find_by_id(&item.product.to_string()).await? {
            items.push(OrderLineView {
                product,
                quantity: item.quantity,
                price: item.price,
            });
        }
    }

    let total_amount = items.iter().map(|l| l.price * l.quantity as f64).sum();

    Ok(OrderView {
        id: order.id,
        user: order.user,
        items,
        total_amount,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        order_status: order.order_status,
        shipping_address: order.shipping_address,
        created_at: order.created_at,
    })
}

/// POST /api/orders/checkout - 直接下单 (货到付款，无地址)
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let engine = CheckoutEngine::new(state.db.clone());
    let order = engine.direct_order(&user.id).await?;
    Ok(Json(order))
}

/// GET /api/orders - 当前用户的订单，最新在前
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let stored = orders.find_by_user(&user.id).await?;
    let mut views = Vec::with_capacity(stored.len());
    for order in stored {
        views.push(order_view(&products, order).await?);
    }

    Ok(Json(views))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// DELETE /api/orders/:id - 删除自己的订单
///
/// 订单不存在与订单属于他人返回同一个 404。
pub async fn delete_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let orders = OrderRepository::new(state.db.clone());

    if !orders.delete_owned(&id, &user.id).await? {
        return Err(AppError::not_found("Order not found"));
    }

    Ok(Json(DeleteResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
