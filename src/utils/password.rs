use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::{AppError, AppResult};

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {e}"),
        })
}

/// [`hash_password`] on the blocking pool, keeping Argon2 off the async workers.
pub async fn hash_password_async(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_async(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await?
}

/// Checks a password against a stored PHC hash string.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is malformed: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hash of a random secret that is immediately discarded. Accounts created
/// with it exist but cannot log in until their password is reset.
pub fn unusable_password_hash() -> AppResult<String> {
    let secret: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();
    hash_password(&secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("diner-password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("diner-password", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("p1").unwrap();
        let second = hash_password("p1").unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_async_helpers_agree_with_sync() {
        let hash = hash_password_async("pizza".to_string()).await.unwrap();
        assert!(verify_password("pizza", &hash).unwrap());
        assert!(verify_password_async("pizza".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_async("pasta".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext").is_err());
    }

    #[test]
    fn test_unusable_hash_rejects_common_guesses() {
        let hash = unusable_password_hash().unwrap();
        assert!(!verify_password("", &hash).unwrap());
        assert!(!verify_password("admin", &hash).unwrap());
    }
}
