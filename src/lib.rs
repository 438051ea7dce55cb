//! 招聘平台凭证与令牌生命周期子系统
//! 提供密码哈希、签名令牌签发/校验与密码策略评估

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
