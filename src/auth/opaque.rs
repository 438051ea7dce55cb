//! Opaque random token generation and one-way digests

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Default opaque token length
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Opaque token generator
pub struct OpaqueTokenGenerator;

impl OpaqueTokenGenerator {
    /// Generate a 32-char alphanumeric token from a CSPRNG
    pub fn generate() -> String {
        Self::generate_with_length(DEFAULT_TOKEN_LENGTH)
    }

    /// Generate a token of the given length
    pub fn generate_with_length(length: usize) -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }

    /// Hash a sensitive string for storage using SHA-256
    ///
    /// Persist the digest instead of the plaintext token so the token is
    /// never recoverable from storage.
    pub fn digest(input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_length() {
        let token = OpaqueTokenGenerator::generate();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_with_length() {
        let token = OpaqueTokenGenerator::generate_with_length(64);
        assert_eq!(token.len(), 64);
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let token1 = OpaqueTokenGenerator::generate();
        let token2 = OpaqueTokenGenerator::generate();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let token = "sensitive_token_123456789012345678901234";
        let digest1 = OpaqueTokenGenerator::digest(token);
        let digest2 = OpaqueTokenGenerator::digest(token);
        assert_eq!(digest1, digest2);
    }

    #[test]
    fn test_digest_is_different_for_different_inputs() {
        let digest1 = OpaqueTokenGenerator::digest("token-a");
        let digest2 = OpaqueTokenGenerator::digest("token-b");
        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_digest_length() {
        // SHA-256 produces 64 hex characters
        let digest = OpaqueTokenGenerator::digest("anything");
        assert_eq!(digest.len(), 64);
    }
}
