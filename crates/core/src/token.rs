//! Opaque one-time tokens (password reset).
//!
//! The raw token is handed to the requester once; only its SHA-256 hash and
//! expiry are ever persisted.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of generated tokens in bytes (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Lifetime of a password reset token.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// A freshly generated reset token.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Raw token for the requester. Never persisted.
    pub raw: String,
    /// Hex SHA-256 of `raw`, the only form stored.
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Secure token generator.
pub struct TokenGenerator;

impl TokenGenerator {
    /// Generate a random URL-safe base64 token.
    #[must_use]
    pub fn generate_secure_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hash a token for storage and lookup.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Generate a password reset token valid for one hour.
    #[must_use]
    pub fn generate_reset_token() -> ResetToken {
        let raw = Self::generate_secure_token();
        let hash = Self::hash_token(&raw);

        ResetToken {
            raw,
            hash,
            expires_at: Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_token_hash_matches_raw() {
        let token = TokenGenerator::generate_reset_token();

        assert_eq!(TokenGenerator::hash_token(&token.raw), token.hash);
        assert_ne!(token.raw, token.hash);
        assert!(token.expires_at > Utc::now() + Duration::minutes(59));
        assert!(token.expires_at <= Utc::now() + Duration::minutes(60));
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = TokenGenerator::generate_secure_token();
        let b = TokenGenerator::generate_secure_token();

        assert_ne!(a, b);
        assert!(!a.contains('+'));
        assert!(!a.contains('/'));
        assert!(!a.contains('='));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = TokenGenerator::hash_token("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
