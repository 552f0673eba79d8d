//! Cart API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Cart, CartLineView, CartMutationResponse, CartView, ProductId};
use crate::db::repository::{CartRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

/// 购物车变更载荷 (add / remove / update 共用)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

/// 解析客户端传来的商品 ID ("product:abc" 或纯 "abc")
fn parse_product_id(raw: &str) -> ProductId {
    match raw.split_once(':') {
        Some((table, key)) if table == "product" => RecordId::from((table, key)),
        _ => RecordId::from(("product", raw)),
    }
}

fn required_product_id(payload: &CartItemRequest) -> AppResult<ProductId> {
    let raw = payload
        .product_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("Product ID is required"))?;
    Ok(parse_product_id(raw))
}

/// 解析购物车中的商品引用，生成展示视图。
///
/// 已下架商品的行保留，product 字段为 null。
async fn cart_view(products: &ProductRepository, cart: &Cart) -> AppResult<CartView> {
    let mut items = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let product = products.find_by_id(&item.product.to_string()).await?;
        items.push(CartLineView {
            product_id: item.product.clone(),
            product,
            quantity: item.quantity,
        });
    }

    Ok(CartView {
        id: cart.id.clone(),
        user: cart.user.clone(),
        items,
    })
}

async fn mutation_response(
    products: &ProductRepository,
    cart: &Cart,
    message: &str,
) -> AppResult<Json<CartMutationResponse>> {
    let view = cart_view(products, cart).await?;
    Ok(Json(CartMutationResponse {
        message: message.to_string(),
        item_count: cart.item_count(),
        cart: view,
    }))
}

/// GET /api/cart - 当前用户的购物车 (从未变更过时返回空车)
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    let carts = CartRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let cart = carts
        .find_by_user(&user.id)
        .await?
        .unwrap_or_else(|| Cart::new(user.id.clone()));

    Ok(Json(cart_view(&products, &cart).await?))
}

/// POST /api/cart/add - 加入购物车，重复商品合并数量
pub async fn add_to_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<CartMutationResponse>> {
    let product_id = required_product_id(&payload)?;
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let products = ProductRepository::new(state.db.clone());
    let product = products
        .find_by_id(&product_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", product_id)))?;
    let canonical_id = product
        .id
        .ok_or_else(|| AppError::internal("Catalog product has no id"))?;

    let carts = CartRepository::new(state.db.clone());
    let mut cart = carts
        .find_by_user(&user.id)
        .await?
        .unwrap_or_else(|| Cart::new(user.id.clone()));

    cart.add_item(canonical_id, quantity);
    let saved = carts.save(&cart).await?;

    mutation_response(&products, &saved, "Item added to cart").await
}

/// POST /api/cart/remove - 移除一行；不存在的行是 no-op
pub async fn remove_from_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<CartMutationResponse>> {
    let product_id = required_product_id(&payload)?;

    let carts = CartRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let mut cart = carts
        .find_by_user(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart not found"))?;

    cart.remove_item(&product_id);
    let saved = carts.save(&cart).await?;

    mutation_response(&products, &saved, "Item removed from cart").await
}

/// POST /api/cart/update - 覆盖数量；0 等价于移除
pub async fn update_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<CartMutationResponse>> {
    let product_id = required_product_id(&payload)?;
    let quantity = payload
        .quantity
        .ok_or_else(|| AppError::validation("Quantity is required"))?;
    if quantity < 0 {
        return Err(AppError::validation("Quantity cannot be negative"));
    }

    let carts = CartRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let mut cart = carts
        .find_by_user(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart not found"))?;

    if !cart.set_quantity(&product_id, quantity) {
        return Err(AppError::not_found("Item not found in cart"));
    }
    let saved = carts.save(&cart).await?;

    mutation_response(&products, &saved, "Cart updated").await
}
