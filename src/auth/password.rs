use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use super::AuthError;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::PasswordHash(err.to_string()))?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` is a mismatch; an unparseable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AuthError::PasswordHash(format!("invalid stored hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AuthError::Internal(format!("password hashing task failed: {err}")))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| AuthError::Internal(format!("password verification task failed: {err}")))?
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthError;

    use super::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash_password("Secur3Pass!").expect("hash should succeed");
        let second = hash_password("Secur3Pass!").expect("hash should succeed");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("Secur3Pass!", &first).expect("verify should run"));
        assert!(!verify_password("wrong", &first).expect("verify should run"));
    }

    #[test]
    fn unparseable_hash_is_an_error() {
        let err = verify_password("Secur3Pass!", "not-a-valid-hash")
            .expect_err("verify should fail");

        assert!(matches!(err, AuthError::PasswordHash(_)));
    }

    #[tokio::test]
    async fn blocking_wrappers_round_trip() {
        let hash = hash_password_blocking("Secur3Pass!".to_string())
            .await
            .expect("hash should succeed");

        let ok = verify_password_blocking("Secur3Pass!".to_string(), hash)
            .await
            .expect("verify should run");
        assert!(ok);
    }
}
