//! Claims → principal mapping.
//!
//! The mapping is an injected strategy (`PrincipalExtractor`) so other identity
//! back-ends (introspection endpoints, directory lookups) can be plugged in
//! without touching the verifier or the policy builder.

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::auth::token::Claims;

pub const DEFAULT_PRINCIPAL_CLAIM: &str = "channel";

/// Identity context value.
///
/// Gateways reject arrays and objects in authorizer context, so only flat
/// scalars are representable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl ContextValue {
    /// `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::String(s) => f.write_str(s),
            ContextValue::Number(n) => write!(f, "{}", n),
            ContextValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

pub type PrincipalContext = BTreeMap<String, ContextValue>;

/// Authenticated caller plus the context echoed to the backend integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: String,
    pub context: PrincipalContext,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: PrincipalContext::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    #[error("{0} is required in authentication token")]
    MissingClaim(String),
    #[error("claim '{0}' must be a string, number or boolean")]
    NonScalarClaim(String),
    #[error("invalid principal: {0}")]
    InvalidPrincipal(&'static str),
    #[error("principal lookup failed: {0}")]
    Lookup(String),
}

/// Strategy that turns verified claims into a principal.
///
/// Async so implementations can consult external identity stores.
#[async_trait]
pub trait PrincipalExtractor: Send + Sync {
    async fn extract(&self, claims: &Claims) -> Result<Principal, PrincipalError>;
}

/// Uses a single mandatory claim as both the principal id and its context.
#[derive(Debug, Clone)]
pub struct ClaimPrincipalExtractor {
    claim: String,
}

impl ClaimPrincipalExtractor {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
        }
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }
}

impl Default for ClaimPrincipalExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PRINCIPAL_CLAIM)
    }
}

#[async_trait]
impl PrincipalExtractor for ClaimPrincipalExtractor {
    async fn extract(&self, claims: &Claims) -> Result<Principal, PrincipalError> {
        let raw = claims
            .get(&self.claim)
            .filter(|v| !v.is_null())
            .ok_or_else(|| PrincipalError::MissingClaim(self.claim.clone()))?;

        let value = ContextValue::from_json(raw)
            .ok_or_else(|| PrincipalError::NonScalarClaim(self.claim.clone()))?;

        Ok(Principal::new(value.to_string()).with_context(self.claim.clone(), value))
    }
}

/// Runs the extraction strategy and checks what it produced.
///
/// Performs no token verification of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalResolver;

impl PrincipalResolver {
    pub async fn resolve(
        &self,
        claims: &Claims,
        extractor: &dyn PrincipalExtractor,
    ) -> Result<Principal, PrincipalError> {
        let principal = extractor.extract(claims).await?;

        if principal.id.trim().is_empty() {
            return Err(PrincipalError::InvalidPrincipal("principal id is empty"));
        }

        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        value.as_object().cloned().unwrap()
    }

    struct Fixed(Principal);

    #[async_trait]
    impl PrincipalExtractor for Fixed {
        async fn extract(&self, _claims: &Claims) -> Result<Principal, PrincipalError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn channel_claim_becomes_principal_and_context() {
        let principal = PrincipalResolver
            .resolve(
                &claims(json!({ "channel": "finance", "other": [1, 2] })),
                &ClaimPrincipalExtractor::default(),
            )
            .await
            .unwrap();

        assert_eq!(principal.id, "finance");
        assert_eq!(principal.context.len(), 1);
        assert_eq!(principal.context.get("channel"), Some(&ContextValue::from("finance")));
    }

    #[tokio::test]
    async fn numeric_claim_is_rendered_as_string_id() {
        let principal = ClaimPrincipalExtractor::default()
            .extract(&claims(json!({ "channel": 42 })))
            .await
            .unwrap();
        assert_eq!(principal.id, "42");
        assert_eq!(principal.context.get("channel"), Some(&ContextValue::from(42_i64)));
    }

    #[tokio::test]
    async fn missing_or_null_claim_fails() {
        let extractor = ClaimPrincipalExtractor::default();
        for c in [json!({ "otherProp": "x" }), json!({ "channel": null })] {
            assert_eq!(
                extractor.extract(&claims(c)).await,
                Err(PrincipalError::MissingClaim("channel".into()))
            );
        }
    }

    #[tokio::test]
    async fn nested_claim_is_rejected() {
        let extractor = ClaimPrincipalExtractor::new("tenant");
        assert_eq!(
            extractor
                .extract(&claims(json!({ "tenant": { "id": 1 } })))
                .await,
            Err(PrincipalError::NonScalarClaim("tenant".into()))
        );
    }

    #[tokio::test]
    async fn resolver_rejects_empty_principal_id() {
        let extractor = Fixed(Principal::new("  "));
        assert_eq!(
            PrincipalResolver.resolve(&Claims::new(), &extractor).await,
            Err(PrincipalError::InvalidPrincipal("principal id is empty"))
        );
    }

    #[test]
    fn context_serializes_as_flat_scalars() {
        let principal = Principal::new("p")
            .with_context("channel", "finance")
            .with_context("tier", 3_i64)
            .with_context("beta", true);
        assert_eq!(
            serde_json::to_value(&principal.context).unwrap(),
            json!({ "beta": true, "channel": "finance", "tier": 3 })
        );
    }
}
