//! Password hashing using Argon2id (OWASP recommended).
//!
//! Hashing is deliberately slow, so the async variants move the work onto
//! the blocking thread pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::AppError;

/// Hash a password using Argon2id.
///
/// # Errors
/// Returns `AppError::Internal` if password hashing fails.
pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against its hash.
#[must_use]
pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash a password without blocking the async runtime.
///
/// # Errors
/// Returns `AppError::Internal` if hashing fails or the blocking task panics.
pub async fn hash_async(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hash task failed: {e}")))?
}

/// Verify a password without blocking the async runtime.
///
/// A failed blocking task verifies as `false`.
pub async fn verify_async(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&password, &hash))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "test_password_123";
        let hash = hash(password).unwrap();

        assert!(verify(password, &hash));
        assert!(!verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_produces_different_results() {
        let password = "same_password";
        let hash1 = hash(password).unwrap();
        let hash2 = hash(password).unwrap();

        assert_ne!(hash1, hash2);

        assert!(verify(password, &hash1));
        assert!(verify(password, &hash2));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify("anything", "not-a-phc-string"));
        assert!(!verify("anything", ""));
    }

    #[tokio::test]
    async fn async_variants_agree_with_sync() {
        let hash = hash_async("longenough1".to_string()).await.unwrap();
        assert!(verify_async("longenough1".to_string(), hash.clone()).await);
        assert!(!verify_async("wrong".to_string(), hash).await);
    }
}
