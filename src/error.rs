//! 统一错误模型
//! 定义所有错误类型和对外错误消息格式

use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取用户可见的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Invalid or expired credentials".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }

    // 便捷方法
    pub fn validation(msg: &str) -> Self {
        AppError::Validation(msg.to_string())
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

/// 令牌校验失败原因，仅供内部诊断与日志区分
/// 对调用方一律折叠为 `AppError::Unauthorized`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("signature invalid")]
    SignatureInvalid,

    #[error("token expired")]
    Expired,

    #[error("token kind mismatch")]
    KindMismatch,

    #[error("malformed claims")]
    MalformedClaims,
}

impl From<VerificationError> for AppError {
    fn from(_: VerificationError) -> Self {
        // 不向调用方透露具体失败原因，防止令牌探测
        AppError::Unauthorized
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
