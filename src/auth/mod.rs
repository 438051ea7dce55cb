//! Credential and token-lifecycle module

pub mod opaque;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

pub use opaque::OpaqueTokenGenerator;
pub use password::PasswordHasher;
pub use policy::{PasswordPolicy, PasswordStrengthReport};
pub use service::CredentialService;
pub use token::{Identity, Role, TokenClaims, TokenKind, TokenPair, TokenService};
