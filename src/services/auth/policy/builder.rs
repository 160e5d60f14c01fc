use super::document::{AuthorizerResponse, POLICY_VERSION, PolicyDocument, Statement};
use super::error::PolicyError;
use super::method_arn::MethodArn;
use super::rule::{Conditions, Effect, MethodRule};
use super::verb::MethodVerb;
use crate::services::auth::principal::PrincipalContext;

const WILDCARD: &str = "*";

/// Deployment coordinates used when composing resource ARNs.
///
/// Missing or empty values become `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOptions {
    pub region: Option<String>,
    pub api_id: Option<String>,
    pub stage: Option<String>,
}

impl From<&MethodArn> for ApiOptions {
    fn from(arn: &MethodArn) -> Self {
        Self {
            region: Some(arn.region.clone()),
            api_id: Some(arn.api_id.clone()),
            stage: Some(arn.stage.clone()),
        }
    }
}

fn or_wildcard(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| WILDCARD.to_string())
}

#[derive(Debug, Clone)]
struct ResourceEntry {
    arn: String,
    conditions: Option<Conditions>,
}

/// Accumulates allow/deny method rules for one principal and compiles them
/// into the gateway policy.
///
/// Built fresh per authorization request.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    principal_id: String,
    account_id: String,
    region: String,
    api_id: String,
    stage: String,
    allow: Vec<ResourceEntry>,
    deny: Vec<ResourceEntry>,
}

impl PolicyBuilder {
    pub fn new(
        principal_id: impl Into<String>,
        account_id: impl Into<String>,
        options: ApiOptions,
    ) -> Self {
        Self {
            principal_id: principal_id.into(),
            account_id: account_id.into(),
            region: or_wildcard(options.region),
            api_id: or_wildcard(options.api_id),
            stage: or_wildcard(options.stage),
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }

    /// Validate a rule, compose its resource ARN and record it under its effect.
    pub fn add_rule(&mut self, rule: MethodRule) -> Result<&mut Self, PolicyError> {
        rule.validate()?;

        let conditions = rule.effective_conditions().cloned();
        let entry = ResourceEntry {
            arn: self.resource_arn(rule.verb, &rule.resource_path),
            conditions,
        };

        match rule.effect {
            Effect::Allow => self.allow.push(entry),
            Effect::Deny => self.deny.push(entry),
        }
        Ok(self)
    }

    /// String-typed entry point; rejects verbs outside the supported set.
    pub fn add_method(
        &mut self,
        effect: Effect,
        verb: &str,
        resource_path: &str,
        conditions: Option<Conditions>,
    ) -> Result<&mut Self, PolicyError> {
        let verb: MethodVerb = verb.parse()?;
        let mut rule = MethodRule::new(effect, verb, resource_path);
        rule.conditions = conditions;
        self.add_rule(rule)
    }

    pub fn allow_all(&mut self) -> &mut Self {
        self.push_wildcard(Effect::Allow)
    }

    pub fn deny_all(&mut self) -> &mut Self {
        self.push_wildcard(Effect::Deny)
    }

    pub fn allow_method(
        &mut self,
        verb: impl Into<MethodVerb>,
        resource_path: &str,
    ) -> Result<&mut Self, PolicyError> {
        self.add_rule(MethodRule::allow(verb, resource_path))
    }

    pub fn deny_method(
        &mut self,
        verb: impl Into<MethodVerb>,
        resource_path: &str,
    ) -> Result<&mut Self, PolicyError> {
        self.add_rule(MethodRule::deny(verb, resource_path))
    }

    pub fn allow_method_with_conditions(
        &mut self,
        verb: impl Into<MethodVerb>,
        resource_path: &str,
        conditions: Conditions,
    ) -> Result<&mut Self, PolicyError> {
        self.add_rule(MethodRule::allow(verb, resource_path).with_conditions(conditions))
    }

    pub fn deny_method_with_conditions(
        &mut self,
        verb: impl Into<MethodVerb>,
        resource_path: &str,
        conditions: Conditions,
    ) -> Result<&mut Self, PolicyError> {
        self.add_rule(MethodRule::deny(verb, resource_path).with_conditions(conditions))
    }

    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }

    /// Compile the accumulated rules.
    ///
    /// Statement order: merged unconditional Allow, conditional Allow (insertion
    /// order), then the same for Deny. A `Condition` block applies to a whole
    /// statement, so conditional rules are never merged.
    pub fn build(self) -> Result<AuthorizerResponse, PolicyError> {
        if self.is_empty() {
            return Err(PolicyError::EmptyPolicy);
        }

        let mut statement = statements_for(Effect::Allow, self.allow);
        statement.extend(statements_for(Effect::Deny, self.deny));

        Ok(AuthorizerResponse {
            principal_id: self.principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION,
                statement,
            },
            context: PrincipalContext::new(),
        })
    }

    fn push_wildcard(&mut self, effect: Effect) -> &mut Self {
        let entry = ResourceEntry {
            arn: self.resource_arn(MethodVerb::Any, WILDCARD),
            conditions: None,
        };
        match effect {
            Effect::Allow => self.allow.push(entry),
            Effect::Deny => self.deny.push(entry),
        }
        self
    }

    fn resource_arn(&self, verb: MethodVerb, resource_path: &str) -> String {
        let cleaned = resource_path.strip_prefix('/').unwrap_or(resource_path);
        format!(
            "arn:aws:execute-api:{}:{}:{}/{}/{}/{}",
            self.region, self.account_id, self.api_id, self.stage, verb, cleaned
        )
    }
}

fn statements_for(effect: Effect, entries: Vec<ResourceEntry>) -> Vec<Statement> {
    let mut merged = Statement::new(effect);
    let mut conditional = Vec::new();

    for entry in entries {
        match entry.conditions {
            None => merged.resource.push(entry.arn),
            Some(conditions) => {
                let mut statement = Statement::new(effect);
                statement.resource.push(entry.arn);
                statement.condition = Some(conditions);
                conditional.push(statement);
            }
        }
    }

    let mut out = Vec::with_capacity(conditional.len() + 1);
    if !merged.resource.is_empty() {
        out.push(merged);
    }
    out.extend(conditional);
    out
}
