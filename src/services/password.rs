//! Argon2id password hashing and verification.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;

/// A stored hash could not be checked at all (malformed PHC string, unknown
/// algorithm, legacy format). Callers treat this as a failed match.
#[derive(Debug, Error)]
#[error("Password verification error: {0}")]
pub struct VerificationError(String);

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash with a fresh random salt. Two calls on the same input never match.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

        Ok(hash.to_string())
    }

    /// `Ok(true)` on match, `Ok(false)` on mismatch. The cost parameters are read
    /// from the stored hash, so rows hashed under older settings still verify.
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, VerificationError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| VerificationError(format!("invalid hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(VerificationError(e.to_string())),
        }
    }

    /// Argon2 is CPU-bound, keep it off the async workers.
    pub async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = self.clone();
        let password = password.to_string();

        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("Password hashing task panicked")?
    }

    pub async fn verify_blocking(
        &self,
        hash: String,
        password: &str,
    ) -> Result<bool, VerificationError> {
        let hasher = self.clone();
        let password = password.to_string();

        task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| VerificationError(format!("verification task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::from_config(&SecurityConfig::default()).unwrap()
    }

    #[test]
    fn hash_round_trips() {
        let hasher = hasher();
        let hash = hasher.hash("hunter2").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "hunter2").unwrap());
        assert!(!hasher.verify(&hash, "hunter3").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = hasher();
        let first = hasher.hash("admin123").unwrap();
        let second = hasher.hash("admin123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "admin123").unwrap());
        assert!(hasher.verify(&second, "admin123").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_panic() {
        let hasher = hasher();

        assert!(hasher.verify("not a hash", "pw").is_err());
        assert!(hasher.verify("", "pw").is_err());
    }

    #[test]
    fn legacy_bcrypt_hash_is_rejected() {
        let hasher = hasher();
        let bcrypt = "$2b$12$KIXQJmB3b1v5S7l6r6cFQOeXl0C0mYh8p3bZ0aQ2l1QnV6R8m8xXG";

        assert!(hasher.verify(bcrypt, "admin123").is_err());
    }

    #[test]
    fn hashes_from_other_params_still_verify() {
        let strong = hasher();
        let weak = PasswordHasher::from_config(&SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        })
        .unwrap();

        let hash = weak.hash("pw").unwrap();
        assert!(strong.verify(&hash, "pw").unwrap());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let result = PasswordHasher::from_config(&SecurityConfig {
            argon2_time_cost: 0,
            ..SecurityConfig::default()
        });

        assert!(result.is_err());
    }
}
