//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 用户注册/登录
//! - [`products`] - 商品目录 (公开只读)
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口 (直接下单 / 列表 / 删除)
//! - [`payment`] - 结账与支付接口
//! - [`admin`] - 后台管理接口

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod payment;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
