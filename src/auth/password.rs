use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{MarketError, MarketResult};

/// Argon2id PHC hashing with a random salt per password
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordManager;

impl PasswordManager {
    pub fn hash(&self, password: &str) -> MarketResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| MarketError::Internal(format!("Hashing failed: {}", e)))
    }

    /// False for a wrong password and for a stored hash that does not parse
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("[AUTH] Unreadable password hash: {}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
