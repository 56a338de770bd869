use crate::config::PasswordConfig;
use crate::error::{AppError, AppResult};

pub mod argon2_hasher;

pub use argon2_hasher::Argon2idHasher;

/// A one-way password hashing scheme
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> AppResult<String>;

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Hashes user passwords before they reach storage.
pub struct PasswordManager {
    hasher: Box<dyn PasswordHasher>,
}

impl PasswordManager {
    pub fn new(hasher: Box<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    pub fn from_config(config: &PasswordConfig) -> AppResult<Self> {
        let hasher = Argon2idHasher::with_cost(config.memory_kib, config.iterations)?;
        Ok(Self::new(Box::new(hasher)))
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::invalid_field(
                "password",
                "password must be longer than or equal to 1 characters",
            ));
        }
        self.hasher.hash_password(password)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        self.hasher.verify_password(password, hash)
    }
}
