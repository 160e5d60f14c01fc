//! Output shapes consumed by the gateway.
//!
//! Field names and casing here are an external contract (`principalId`,
//! `policyDocument`, `Version`, `Statement`, `Action`, `Effect`, `Resource`,
//! `Condition`); do not rename.

use serde::Serialize;

use super::rule::{Conditions, Effect};
use crate::services::auth::principal::PrincipalContext;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: &'static str,
    pub effect: Effect,
    pub resource: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Conditions>,
}

impl Statement {
    pub(crate) fn new(effect: Effect) -> Self {
        Self {
            action: INVOKE_ACTION,
            effect,
            resource: Vec::new(),
            condition: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<Statement>,
}

/// Authorizer result handed back to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: PrincipalContext,
}

impl AuthorizerResponse {
    /// Attach identity context; the gateway exposes it as `$context.authorizer.<key>`.
    pub fn with_context(mut self, context: PrincipalContext) -> Self {
        self.context = context;
        self
    }
}
