//! Signed token issuance and verification
//! Implements the access / refresh / password-reset / email-verification token kinds

use crate::{
    config::AppConfig,
    error::{AppError, VerificationError},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role carried inside token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Recruiter,
    Admin,
}

/// Token kind; each kind is issued and verified independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    PasswordReset,
    EmailVerification,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::PasswordReset => "password_reset",
            TokenKind::EmailVerification => "email_verification",
        }
    }
}

/// Claims carried by a signed token, discriminated by `token_kind`
///
/// Unknown kinds or roles fail deserialization and surface as malformed
/// claims rather than being coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "token_kind", rename_all = "snake_case")]
pub enum TokenClaims {
    Access {
        sub: String,
        email: String,
        role: Role,
        iat: i64,
        exp: i64,
        jti: String,
    },
    Refresh {
        sub: String,
        email: String,
        role: Role,
        iat: i64,
        exp: i64,
        jti: String,
    },
    /// Bound to an email only; the account is looked up by email downstream
    PasswordReset {
        email: String,
        iat: i64,
        exp: i64,
        jti: String,
    },
    /// Binds verification to a specific (subject, email) pair
    EmailVerification {
        sub: String,
        email: String,
        iat: i64,
        exp: i64,
        jti: String,
    },
}

impl TokenClaims {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenClaims::Access { .. } => TokenKind::Access,
            TokenClaims::Refresh { .. } => TokenKind::Refresh,
            TokenClaims::PasswordReset { .. } => TokenKind::PasswordReset,
            TokenClaims::EmailVerification { .. } => TokenKind::EmailVerification,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            TokenClaims::Access { email, .. }
            | TokenClaims::Refresh { email, .. }
            | TokenClaims::PasswordReset { email, .. }
            | TokenClaims::EmailVerification { email, .. } => email,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            TokenClaims::Access { sub, .. }
            | TokenClaims::Refresh { sub, .. }
            | TokenClaims::EmailVerification { sub, .. } => Some(sub),
            TokenClaims::PasswordReset { .. } => None,
        }
    }

    pub fn expires_at(&self) -> i64 {
        match self {
            TokenClaims::Access { exp, .. }
            | TokenClaims::Refresh { exp, .. }
            | TokenClaims::PasswordReset { exp, .. }
            | TokenClaims::EmailVerification { exp, .. } => *exp,
        }
    }

    pub fn jti(&self) -> &str {
        match self {
            TokenClaims::Access { jti, .. }
            | TokenClaims::Refresh { jti, .. }
            | TokenClaims::PasswordReset { jti, .. }
            | TokenClaims::EmailVerification { jti, .. } => jti,
        }
    }

    /// Per-kind semantic checks beyond what deserialization enforces
    fn well_formed(&self) -> bool {
        match self {
            TokenClaims::Access { sub, email, .. } | TokenClaims::Refresh { sub, email, .. } => {
                !sub.is_empty() && !email.is_empty()
            }
            TokenClaims::PasswordReset { email, .. } => !email.is_empty(),
            TokenClaims::EmailVerification { sub, email, .. } => {
                !sub.is_empty() && !email.is_empty()
            }
        }
    }
}

/// Subject triple supplied by the caller when issuing session tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub sub: String,
    pub email: String,
    pub role: Role,
}

/// Token pair response
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64, // seconds until access token expires
}

/// Signed token codec
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
    password_reset_exp_secs: u64,
    email_verification_exp_secs: u64,
}

impl TokenService {
    /// Create token service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.token_secret.expose_secret();

        // Ensure secret is at least 32 bytes for the HMAC family
        if secret.len() < 32 {
            return Err(AppError::Config("Token secret too short (min 32 chars)".to_string()));
        }

        let algorithm: Algorithm = config
            .security
            .token_algorithm
            .parse()
            .map_err(|_| {
                AppError::Config(format!(
                    "Unsupported token algorithm: {}",
                    config.security.token_algorithm
                ))
            })?;

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm,
            access_token_exp_secs: config.security.access_token_exp_secs,
            refresh_token_exp_secs: config.security.refresh_token_exp_secs,
            password_reset_exp_secs: config.security.password_reset_exp_secs,
            email_verification_exp_secs: config.security.email_verification_exp_secs,
        })
    }

    pub fn access_token_exp_secs(&self) -> u64 {
        self.access_token_exp_secs
    }

    fn timestamps(&self, ttl_secs: u64) -> (i64, i64) {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_secs as i64);
        (now.timestamp(), expiration.timestamp())
    }

    /// Issue an access token
    pub fn issue_access(&self, identity: &Identity) -> Result<String, AppError> {
        let (iat, exp) = self.timestamps(self.access_token_exp_secs);

        self.encode(&TokenClaims::Access {
            sub: identity.sub.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Issue a refresh token
    pub fn issue_refresh(&self, identity: &Identity) -> Result<String, AppError> {
        let (iat, exp) = self.timestamps(self.refresh_token_exp_secs);

        self.encode(&TokenClaims::Refresh {
            sub: identity.sub.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Issue an access + refresh pair sharing the same identity claims
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AppError> {
        let access_token = self.issue_access(identity)?;

        let refresh_token = self.issue_refresh(identity)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_exp_secs,
        })
    }

    /// Issue a password-reset token bound to an email only
    pub fn issue_password_reset(&self, email: &str) -> Result<String, AppError> {
        let (iat, exp) = self.timestamps(self.password_reset_exp_secs);

        self.encode(&TokenClaims::PasswordReset {
            email: email.to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Issue an email-verification token bound to (subject, email)
    pub fn issue_email_verification(&self, sub: &str, email: &str) -> Result<String, AppError> {
        let (iat, exp) = self.timestamps(self.email_verification_exp_secs);

        self.encode(&TokenClaims::EmailVerification {
            sub: sub.to_string(),
            email: email.to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Sign an already-built claim set
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, AppError> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(
            |e| {
                tracing::error!(kind = claims.kind().as_str(), "Failed to encode token: {:?}", e);
                AppError::Internal(format!("Failed to encode token: {}", e))
            },
        )
    }

    /// Verify signature and expiry, then enforce the expected kind
    ///
    /// The returned error distinguishes causes for diagnostics only; the
    /// service boundary collapses every cause into a uniform unauthorized
    /// outcome.
    pub fn decode(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<TokenClaims, VerificationError> {
        let mut validation = Validation::new(self.algorithm);
        // Issue and check share the same wall clock; no skew window
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let cause = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        VerificationError::Expired
                    }
                    jsonwebtoken::errors::ErrorKind::Json(_)
                    | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                        VerificationError::MalformedClaims
                    }
                    _ => VerificationError::SignatureInvalid,
                };
                tracing::debug!(
                    expected = expected.as_str(),
                    cause = %cause,
                    "Token verification failed: {:?}",
                    e
                );
                cause
            })?;

        let claims = data.claims;

        if claims.kind() != expected {
            tracing::debug!(
                expected = expected.as_str(),
                got = claims.kind().as_str(),
                "Token kind mismatch"
            );
            return Err(VerificationError::KindMismatch);
        }

        if !claims.well_formed() {
            tracing::debug!(kind = claims.kind().as_str(), "Token claims missing required fields");
            return Err(VerificationError::MalformedClaims);
        }

        Ok(claims)
    }
}
