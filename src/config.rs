//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// 出厂占位密钥，启动校验会拒绝该值
pub const PLACEHOLDER_TOKEN_SECRET: &str = "change-this-secret-in-production-min-32-chars!";

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// 令牌签名密钥（使用 Secret 包装，防止日志泄露）
    pub token_secret: Secret<String>,
    /// 签名算法: HS256, HS384, HS512
    pub token_algorithm: String,
    /// 访问令牌过期时间（秒）
    pub access_token_exp_secs: u64,
    /// 刷新令牌过期时间（秒）
    pub refresh_token_exp_secs: u64,
    /// 密码重置令牌过期时间（秒）
    pub password_reset_exp_secs: u64,
    /// 邮箱验证令牌过期时间（秒）
    pub email_verification_exp_secs: u64,
    /// 密码最小长度
    pub password_min_length: usize,
    /// Argon2 内存开销（KiB）
    pub argon2_memory_kib: u32,
    /// Argon2 迭代次数
    pub argon2_iterations: u32,
    /// Argon2 并行度
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.token_secret", PLACEHOLDER_TOKEN_SECRET)?
            .set_default("security.token_algorithm", "HS256")?
            .set_default("security.access_token_exp_secs", 1800)?
            .set_default("security.refresh_token_exp_secs", 604800)?
            .set_default("security.password_reset_exp_secs", 3600)?
            .set_default("security.email_verification_exp_secs", 86400)?
            .set_default("security.password_min_length", 8)?
            .set_default("security.argon2_memory_kib", 65536)?
            .set_default("security.argon2_iterations", 3)?
            .set_default("security.argon2_parallelism", 4)?;

        // 从环境变量加载配置（前缀为 HIREFLOW_）
        settings = settings.add_source(
            Environment::with_prefix("HIREFLOW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 拒绝占位密钥：生产环境必须显式配置真实密钥
        if self.security.token_secret.expose_secret() == PLACEHOLDER_TOKEN_SECRET {
            return Err(ConfigError::Message(
                "token_secret is the shipped placeholder; set HIREFLOW_SECURITY__TOKEN_SECRET"
                    .to_string(),
            ));
        }

        // 验证签名密钥长度（至少 32 字符）
        if self.security.token_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "token_secret must be at least 32 characters long".to_string(),
            ));
        }

        // 验证签名算法
        match self.security.token_algorithm.as_str() {
            "HS256" | "HS384" | "HS512" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid token algorithm: {}. Must be one of: HS256, HS384, HS512",
                    self.security.token_algorithm
                )))
            }
        }

        // 验证令牌过期时间
        if self.security.access_token_exp_secs < 60 || self.security.access_token_exp_secs > 86400 {
            return Err(ConfigError::Message(
                "access_token_exp_secs must be between 60 and 86400 (1 minute to 24 hours)"
                    .to_string(),
            ));
        }

        if self.security.refresh_token_exp_secs < 3600
            || self.security.refresh_token_exp_secs > 2592000
        {
            return Err(ConfigError::Message(
                "refresh_token_exp_secs must be between 3600 and 2592000 (1 hour to 30 days)"
                    .to_string(),
            ));
        }

        if self.security.password_reset_exp_secs < 60
            || self.security.password_reset_exp_secs > 86400
        {
            return Err(ConfigError::Message(
                "password_reset_exp_secs must be between 60 and 86400 (1 minute to 24 hours)"
                    .to_string(),
            ));
        }

        if self.security.email_verification_exp_secs < 300
            || self.security.email_verification_exp_secs > 604800
        {
            return Err(ConfigError::Message(
                "email_verification_exp_secs must be between 300 and 604800 (5 minutes to 7 days)"
                    .to_string(),
            ));
        }

        // 验证密码策略
        if self.security.password_min_length < 6 || self.security.password_min_length > 128 {
            return Err(ConfigError::Message(
                "password_min_length must be between 6 and 128".to_string(),
            ));
        }

        // 验证 Argon2 参数下限
        if self.security.argon2_memory_kib < 8192 {
            return Err(ConfigError::Message(
                "argon2_memory_kib must be at least 8192 (8 MiB)".to_string(),
            ));
        }

        if self.security.argon2_iterations < 1 {
            return Err(ConfigError::Message(
                "argon2_iterations must be at least 1".to_string(),
            ));
        }

        if self.security.argon2_parallelism < 1 {
            return Err(ConfigError::Message(
                "argon2_parallelism must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults_reject_placeholder_secret() {
        // 清理所有可能的环境变量
        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_SECRET");
        std::env::remove_var("HIREFLOW_LOGGING__LEVEL");
        std::env::remove_var("HIREFLOW_LOGGING__FORMAT");

        // 未配置真实密钥时必须拒绝启动
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_config_loads_with_real_secret() {
        std::env::remove_var("HIREFLOW_LOGGING__LEVEL");
        std::env::remove_var("HIREFLOW_LOGGING__FORMAT");

        std::env::set_var(
            "HIREFLOW_SECURITY__TOKEN_SECRET",
            "an-actual-deployment-secret-of-32-chars!",
        );

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.token_algorithm, "HS256");
        assert_eq!(config.security.access_token_exp_secs, 1800);
        assert_eq!(config.security.refresh_token_exp_secs, 604800);

        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_SECRET");
    }

    #[test]
    #[serial]
    fn test_config_validation_secret_too_short() {
        std::env::set_var("HIREFLOW_SECURITY__TOKEN_SECRET", "short");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_SECRET");
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_algorithm() {
        std::env::set_var(
            "HIREFLOW_SECURITY__TOKEN_SECRET",
            "an-actual-deployment-secret-of-32-chars!",
        );
        std::env::set_var("HIREFLOW_SECURITY__TOKEN_ALGORITHM", "none");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_SECRET");
        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_ALGORITHM");
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_log_level() {
        std::env::set_var(
            "HIREFLOW_SECURITY__TOKEN_SECRET",
            "an-actual-deployment-secret-of-32-chars!",
        );
        std::env::set_var("HIREFLOW_LOGGING__LEVEL", "invalid");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("HIREFLOW_SECURITY__TOKEN_SECRET");
        std::env::remove_var("HIREFLOW_LOGGING__LEVEL");
    }
}
