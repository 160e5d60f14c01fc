use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::PolicyError;
use super::verb::MethodVerb;

/// Condition block of a policy statement, passed through to the gateway as-is.
pub type Conditions = serde_json::Map<String, serde_json::Value>;

static RESOURCE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[/.a-zA-Z0-9\-*]+$").expect("resource path pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    #[serde(alias = "allow")]
    Allow,
    #[serde(alias = "deny")]
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// A single allow/deny entry: verb + resource path, optionally conditional.
///
/// Also the on-disk shape of `POLICY_RULES_PATH` entries:
/// `{ "effect": "Allow", "verb": "GET", "resource": "/pets", "conditions": {...} }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodRule {
    pub effect: Effect,
    pub verb: MethodVerb,
    #[serde(rename = "resource", alias = "resourcePath")]
    pub resource_path: String,
    #[serde(default)]
    pub conditions: Option<Conditions>,
}

impl MethodRule {
    pub fn new(effect: Effect, verb: impl Into<MethodVerb>, resource_path: impl Into<String>) -> Self {
        Self {
            effect,
            verb: verb.into(),
            resource_path: resource_path.into(),
            conditions: None,
        }
    }

    pub fn allow(verb: impl Into<MethodVerb>, resource_path: impl Into<String>) -> Self {
        Self::new(Effect::Allow, verb, resource_path)
    }

    pub fn deny(verb: impl Into<MethodVerb>, resource_path: impl Into<String>) -> Self {
        Self::new(Effect::Deny, verb, resource_path)
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Conditions that actually constrain the statement (an empty map does not).
    pub fn effective_conditions(&self) -> Option<&Conditions> {
        self.conditions.as_ref().filter(|c| !c.is_empty())
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_resource_path(&self.resource_path)
    }
}

pub fn validate_resource_path(path: &str) -> Result<(), PolicyError> {
    if RESOURCE_PATH.is_match(path) {
        Ok(())
    } else {
        Err(PolicyError::InvalidResourcePath(path.to_string()))
    }
}
