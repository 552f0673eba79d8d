use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payment::{PaymentGateway, RazorpayClient};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | gateway | Option<Arc<dyn PaymentGateway>> | 支付网关客户端 (未配置时为 None) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 支付网关客户端；None 表示在线支付未配置
    pub gateway: Option<Arc<dyn PaymentGateway>>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`]；测试中用本方法注入内存数据库
    /// 与假网关。
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            gateway,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/minimart.db)
    /// 3. JWT 服务、支付网关客户端
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_dir = PathBuf::from(&config.work_dir).join("database");
        std::fs::create_dir_all(&db_dir).expect("Failed to create work directory structure");

        let db_path = db_dir.join("minimart.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let gateway: Option<Arc<dyn PaymentGateway>> =
            match (&config.razorpay_key_id, &config.razorpay_key_secret) {
                (Some(key_id), Some(key_secret)) => {
                    tracing::info!("Payment gateway client configured");
                    Some(Arc::new(RazorpayClient::new(
                        key_id.clone(),
                        key_secret.clone(),
                    )))
                }
                _ => {
                    tracing::warn!("Payment gateway not configured; online checkout disabled");
                    None
                }
            };

        Self::new(config.clone(), db_service.db, jwt_service, gateway)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 网关 secret (签名验证用)；未配置时为 None
    pub fn gateway_secret(&self) -> Option<&str> {
        self.config.razorpay_key_secret.as_deref()
    }
}
