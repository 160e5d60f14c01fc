//! Secret provider interface used to resolve verification keys at startup.
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub type SecretResult<T> = Result<T, SecretError>;

/// Secret-layer errors.
///
/// Note:
/// - Kept independent from `AppError`; the caller decides how to fail (startup
///   aborts when the verification secret cannot be resolved).
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),
    #[error("secret is empty: {0}")]
    Empty(String),
    #[error("secret backend error: {0}")]
    Backend(String),
}

/// A minimal, string-based secret lookup.
///
/// Implementations own decryption, caching and retries; callers receive the
/// resolved plaintext value.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn get(&self, name: &str) -> SecretResult<String>;
}

// In-memory provider, handy for wiring and tests.
#[async_trait]
impl SecretProvider for HashMap<String, String> {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, name: &str) -> SecretResult<String> {
        let value = HashMap::get(self, name).ok_or_else(|| SecretError::NotFound(name.to_string()))?;
        if value.is_empty() {
            return Err(SecretError::Empty(name.to_string()));
        }
        Ok(value.clone())
    }
}
