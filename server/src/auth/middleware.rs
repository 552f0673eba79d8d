//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health`
/// - `/api/auth/*` (注册/登录)
/// - `/api/admin/login`, `/api/admin/register`
/// - `GET /api/products*` (商品目录公开可读)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/health" {
        return true;
    }
    if path.starts_with("/api/auth/") {
        return true;
    }
    if path == "/api/admin/login" || path == "/api/admin/register" {
        return true;
    }
    // 商品目录公开可读，写操作走管理端
    if method == http::Method::GET && (path == "/api/products" || path.starts_with("/api/products/"))
    {
        return true;
    }
    false
}

/// 管理员中间件 - 要求管理员令牌
///
/// 检查 `CurrentUser.is_admin`
///
/// # 错误
///
/// 非管理员返回 403 Forbidden
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.to_string(),
            email = user.email.clone()
        );
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_route_matching() {
        let get = http::Method::GET;
        let post = http::Method::POST;

        assert!(is_public_api_route(&get, "/api/health"));
        assert!(is_public_api_route(&post, "/api/auth/login"));
        assert!(is_public_api_route(&post, "/api/auth/register"));
        assert!(is_public_api_route(&post, "/api/admin/login"));
        assert!(is_public_api_route(&get, "/api/products"));
        assert!(is_public_api_route(&get, "/api/products/product:abc"));

        assert!(!is_public_api_route(&post, "/api/products"));
        assert!(!is_public_api_route(&get, "/api/cart"));
        assert!(!is_public_api_route(&get, "/api/orders"));
        assert!(!is_public_api_route(&get, "/api/admin/dashboard"));
    }
}
