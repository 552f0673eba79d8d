//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserView};
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录/注册响应：令牌加上不含哈希的账户视图
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

fn validate_registration(data: &UserCreate) -> Result<(), AppError> {
    if data.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if data.email.trim().is_empty() || !data.email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if data.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

fn issue_token(state: &ServerState, user: &User, is_admin: bool) -> AppResult<String> {
    let id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Persisted account has no id"))?;
    state
        .jwt_service
        .generate_token(&id.to_string(), &user.email, is_admin)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))
}

/// POST /api/auth/register - 用户注册
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AuthResponse>> {
    validate_registration(&payload)?;

    let repo = crate::db::repository::UserRepository::new(state.db.clone());
    let user = repo.create_user(payload).await?;
    let token = issue_token(&state, &user, false)?;

    security_log!("INFO", "user_registered", email = user.email.clone());

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/login - 用户登录
///
/// 账户不存在与密码错误返回同一个错误，避免邮箱枚举。
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = crate::db::repository::UserRepository::new(state.db.clone());
    let user = repo
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let verified = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        security_log!("WARN", "login_failed", email = payload.email.clone());
        return Err(AppError::invalid_credentials());
    }

    let token = issue_token(&state, &user, false)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
