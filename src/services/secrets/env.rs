use async_trait::async_trait;

use crate::services::secrets::provider::{SecretError, SecretProvider, SecretResult};

/// Reads secrets from the process environment (`.env` is loaded by `Config`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    fn backend_name(&self) -> &'static str {
        "env"
    }

    async fn get(&self, name: &str) -> SecretResult<String> {
        let value = std::env::var(name).map_err(|e| match e {
            std::env::VarError::NotPresent => SecretError::NotFound(name.to_string()),
            std::env::VarError::NotUnicode(_) => {
                SecretError::Backend(format!("{} is not valid unicode", name))
            }
        })?;

        if value.is_empty() {
            return Err(SecretError::Empty(name.to_string()));
        }
        Ok(value)
    }
}
