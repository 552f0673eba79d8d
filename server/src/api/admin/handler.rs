//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::api::auth::AuthResponse;
use crate::core::ServerState;
use crate::db::models::{
    Order, OrderUpdate, Product, ProductCreate, ProductUpdate, UserCreate,
};
use crate::db::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub secret_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/admin/register - 管理员注册 (口令保护)
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<AdminRegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let expected = state
        .config
        .admin_secret_key
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Admin registration is disabled"))?;
    if payload.secret_key != expected {
        security_log!("WARN", "admin_register_rejected", email = payload.email.clone());
        return Err(AppError::forbidden("Invalid admin secret key"));
    }

    let repo = UserRepository::new(state.db.clone());
    let admin = repo
        .create_admin(UserCreate {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let id = admin
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Persisted account has no id"))?;
    let token = state
        .jwt_service
        .generate_token(&id.to_string(), &admin.email, true)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    security_log!("INFO", "admin_registered", email = admin.email.clone());

    Ok(Json(AuthResponse {
        token,
        user: admin.into(),
    }))
}

/// POST /api/admin/login - 管理员登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let admin = repo
        .find_admin_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let verified = admin
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        security_log!("WARN", "admin_login_failed", email = payload.email.clone());
        return Err(AppError::invalid_credentials());
    }

    let id = admin
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Persisted account has no id"))?;
    let token = state
        .jwt_service
        .generate_token(&id.to_string(), &admin.email, true)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: admin.into(),
    }))
}

/// 后台面板统计
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_users: i64,
    pub pending_orders: i64,
    /// 所有订单 total_amount 之和
    pub total_revenue: f64,
    pub recent_orders: Vec<Order>,
}

/// GET /api/admin/dashboard - 计数、营收与最近订单
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardResponse>> {
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    Ok(Json(DashboardResponse {
        total_products: products.count().await?,
        total_orders: orders.count().await?,
        total_users: users.count_users().await?,
        pending_orders: orders.count_pending().await?,
        total_revenue: orders.total_revenue().await?,
        recent_orders: orders.find_recent(5).await?,
    }))
}

// ========== Product management ==========

/// GET /api/admin/products - 商品列表 (与公开目录同源)
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// POST /api/admin/products - 新建商品
pub async fn create_product(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::validation("Product category is required"));
    }

    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/admin/products/:id - 部分更新商品
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).await?))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// DELETE /api/admin/products/:id - 删除商品
///
/// 购物车和订单里指向它的引用成为 stale 引用，由读取方过滤。
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(DeleteResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

// ========== Order management ==========

/// GET /api/admin/orders - 全部订单，最新在前
pub async fn list_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// PUT /api/admin/orders/:id - 更新订单状态字段
pub async fn update_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if payload.payment_status.is_none() && payload.order_status.is_none() {
        return Err(AppError::validation("Nothing to update"));
    }

    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.update_status(&id, payload).await?))
}
