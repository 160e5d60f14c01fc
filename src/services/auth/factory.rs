/// Factory: build the `Authorizer` and principal extractor from application `Config`.
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::authorizer::Authorizer;
use crate::services::auth::policy::{MethodRule, PolicyError};
use crate::services::auth::principal::{ClaimPrincipalExtractor, PrincipalExtractor};
use crate::services::auth::token::TokenVerifier;
use crate::services::secrets::SecretProvider;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule #{index} is invalid: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: PolicyError,
    },
}

/// Parse and validate a JSON array of method rules.
pub fn parse_rules(raw: &str) -> Result<Vec<MethodRule>, RulesError> {
    let rules: Vec<MethodRule> = serde_json::from_str(raw)?;
    for (index, rule) in rules.iter().enumerate() {
        rule.validate()
            .map_err(|source| RulesError::Invalid { index, source })?;
    }
    Ok(rules)
}

pub async fn load_rules(path: &Path) -> Result<Vec<MethodRule>, RulesError> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_rules(&raw)
}

pub async fn build_authorizer(
    config: &Config,
    secrets: &dyn SecretProvider,
) -> Result<Arc<Authorizer>, AppError> {
    let secret = secrets.get(&config.jwt_secret_name).await.map_err(|e| {
        error!(
            error = %e,
            backend = secrets.backend_name(),
            "failed to resolve token verification secret"
        );
        AppError::Internal
    })?;

    let verifier = TokenVerifier::new(&secret, &config.token_policy()).map_err(|e| {
        error!(error = %e, "failed to build token verifier");
        AppError::Internal
    })?;

    let rules = match config.policy_rules_path.as_deref() {
        Some(path) => {
            let rules = load_rules(path).await.map_err(|e| {
                error!(error = %e, path = %path.display(), "failed to load policy rules");
                AppError::Internal
            })?;
            info!(count = rules.len(), path = %path.display(), "loaded policy rules");
            rules
        }
        None => {
            // No per-principal policy store: every verified principal may call every method.
            info!("no policy rules configured, defaulting to allow all methods");
            Vec::new()
        }
    };

    Ok(Arc::new(Authorizer::new(
        verifier,
        rules,
        config.authorize_timeout,
    )))
}

pub fn build_principal_extractor(config: &Config) -> Arc<dyn PrincipalExtractor> {
    Arc::new(ClaimPrincipalExtractor::new(config.principal_claim.clone()))
}
