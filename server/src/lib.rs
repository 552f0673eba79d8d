//! Minimart Server - 小型电商后端
//!
//! # 架构概述
//!
//! 核心是 购物车 → 结账 → 订单 工作流，三种结账变体写入同一种订单
//! 快照。其余是围绕它的目录、认证与后台管理接口。
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **结账** (`checkout`): 共享校验 + 三种提交变体
//! - **支付** (`payment`): 网关客户端与签名验证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── db/            # 模型与仓储
//! ├── checkout/      # 结账引擎
//! ├── payment/       # 网关客户端、签名验证
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use checkout::CheckoutEngine;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
