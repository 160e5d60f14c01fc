pub mod env;
pub mod provider;

pub use env::EnvSecretProvider;
pub use provider::{SecretError, SecretProvider, SecretResult};
