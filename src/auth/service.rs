//! Credential service composing the token-lifecycle flows
//!
//! Login, refresh rotation, password reset and email verification. Pure
//! orchestration over the codec, hasher and policy; no storage and no
//! hidden state. Argon2 work runs on the blocking pool so it cannot stall
//! the async runtime.

use crate::{
    auth::{
        password::PasswordHasher,
        policy::{PasswordPolicy, PasswordStrengthReport},
        token::{Identity, TokenClaims, TokenKind, TokenPair, TokenService},
    },
    config::AppConfig,
    error::AppError,
};

/// Credential service
#[derive(Clone)]
pub struct CredentialService {
    tokens: TokenService,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl CredentialService {
    /// Create credential service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            tokens: TokenService::from_config(config)?,
            hasher: PasswordHasher::from_config(config)?,
            policy: PasswordPolicy::from_config(config),
        })
    }

    /// Verify a password against a stored credential and issue a session pair
    ///
    /// A wrong password and a malformed stored credential fail identically.
    pub async fn login(
        &self,
        password: &str,
        stored_credential: &str,
        identity: &Identity,
    ) -> Result<TokenPair, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let credential = stored_credential.to_string();

        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &credential))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        if !verified {
            tracing::debug!(sub = %identity.sub, "Login rejected");
            return Err(AppError::Unauthorized);
        }

        self.tokens.issue_pair(identity)
    }

    /// Policy-check then hash a new password (registration / password change)
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let report = self.policy.evaluate(password);
        if !report.valid {
            return Err(AppError::Validation(format!(
                "Password does not meet policy: {}",
                report.failed_checks().join(", ")
            )));
        }

        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Rotate a refresh token into a brand-new access + refresh pair
    ///
    /// The old refresh token stays valid until its own expiry; revocation on
    /// reuse is the caller's session store's concern.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        match self.tokens.decode(refresh_token, TokenKind::Refresh)? {
            TokenClaims::Refresh { sub, email, role, .. } => {
                self.tokens.issue_pair(&Identity { sub, email, role })
            }
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Issue a password-reset token bound to the given email and nothing else
    ///
    /// Whether the email exists is not this subsystem's concern; the caller
    /// keeps its response uniform to avoid account enumeration.
    pub fn request_password_reset(&self, email: &str) -> Result<String, AppError> {
        self.tokens.issue_password_reset(email)
    }

    /// Verify a password-reset token and return the bound email
    pub fn confirm_password_reset(&self, token: &str) -> Result<String, AppError> {
        match self.tokens.decode(token, TokenKind::PasswordReset)? {
            TokenClaims::PasswordReset { email, .. } => Ok(email),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Issue an email-verification token bound to (subject, email)
    pub fn issue_email_verification(&self, sub: &str, email: &str) -> Result<String, AppError> {
        self.tokens.issue_email_verification(sub, email)
    }

    /// Verify an email-verification token and return (subject, email)
    pub fn confirm_email_verification(&self, token: &str) -> Result<(String, String), AppError> {
        match self.tokens.decode(token, TokenKind::EmailVerification)? {
            TokenClaims::EmailVerification { sub, email, .. } => Ok((sub, email)),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Evaluate password strength for caller-side feedback
    pub fn check_password_strength(&self, password: &str) -> PasswordStrengthReport {
        self.policy.evaluate(password)
    }

    /// Access the underlying token codec
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Role;
    use crate::config::{LoggingConfig, SecurityConfig};
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                token_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                token_algorithm: "HS256".to_string(),
                access_token_exp_secs: 1800,
                refresh_token_exp_secs: 604800,
                password_reset_exp_secs: 3600,
                email_verification_exp_secs: 86400,
                password_min_length: 8,
                // 测试用低成本参数，避免拖慢单测
                argon2_memory_kib: 8192,
                argon2_iterations: 1,
                argon2_parallelism: 1,
            },
        }
    }

    fn test_identity() -> Identity {
        Identity {
            sub: "user-1".to_string(),
            email: "candidate@example.com".to_string(),
            role: Role::Candidate,
        }
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let service = CredentialService::from_config(&test_config()).unwrap();
        let credential = service.hash_password("Correct1!pass").await.unwrap();

        let result = service.login("Wrong1!pass", &credential, &test_identity()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_with_malformed_credential_is_unauthorized() {
        let service = CredentialService::from_config(&test_config()).unwrap();

        let result = service
            .login("Correct1!pass", "not-a-credential", &test_identity())
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_hash_password_enforces_policy() {
        let service = CredentialService::from_config(&test_config()).unwrap();

        let result = service.hash_password("weak").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
