use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::services::auth::policy::{
    ApiOptions, AuthorizerResponse, MethodArn, MethodArnError, MethodRule, PolicyBuilder,
    PolicyError,
};
use crate::services::auth::principal::{
    Principal, PrincipalError, PrincipalExtractor, PrincipalResolver,
};
use crate::services::auth::token::{TokenError, TokenVerifier, fingerprint};

/// The only error visible past the authorizer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizeError {
    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Verifying,
    Resolving,
    Building,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Verifying => "verifying",
            Stage::Resolving => "resolving",
            Stage::Building => "building",
        }
    }
}

// Internal cause of a denial; logged, never returned.
#[derive(Debug, Error)]
enum DenyReason {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Principal(#[from] PrincipalError),
    #[error(transparent)]
    MethodArn(#[from] MethodArnError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("deadline of {0:?} elapsed")]
    Timeout(Duration),
}

#[derive(Debug)]
struct Denial {
    stage: Stage,
    reason: DenyReason,
}

impl Denial {
    fn at(stage: Stage) -> impl FnOnce(DenyReason) -> Self {
        move |reason| Self { stage, reason }
    }
}

/// Verify → resolve → build pipeline.
///
/// Holds only immutable configuration; every call builds its own `PolicyBuilder`,
/// so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Authorizer {
    verifier: TokenVerifier,
    // Empty means "allow all methods".
    rules: Vec<MethodRule>,
    timeout: Duration,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier, rules: Vec<MethodRule>, timeout: Duration) -> Self {
        Self {
            verifier,
            rules,
            timeout,
        }
    }

    pub fn rules(&self) -> &[MethodRule] {
        &self.rules
    }

    /// Authorize one gateway invocation.
    ///
    /// Every failure (bad token, rejected claims, malformed method ARN, builder
    /// errors, timeouts) collapses into `AuthorizeError::Unauthorized` after being
    /// logged with full detail. No partial policy is ever returned.
    pub async fn authorize(
        &self,
        token: &str,
        method_arn: &str,
        extractor: &dyn PrincipalExtractor,
    ) -> Result<AuthorizerResponse, AuthorizeError> {
        info!(
            token = %fingerprint(token),
            token_len = token.len(),
            method_arn = %method_arn,
            "authorizing request"
        );

        match self.run(token, method_arn, extractor).await {
            Ok(response) => {
                info!(
                    principal_id = %response.principal_id,
                    statements = response.policy_document.statement.len(),
                    "token is valid, policy generated"
                );
                Ok(response)
            }
            Err(denial) => {
                log_denial(&denial);
                Err(AuthorizeError::Unauthorized)
            }
        }
    }

    async fn run(
        &self,
        token: &str,
        method_arn: &str,
        extractor: &dyn PrincipalExtractor,
    ) -> Result<AuthorizerResponse, Denial> {
        // Verification never yields, so an elapsed deadline is always seen while resolving.
        let principal = tokio::time::timeout(self.timeout, self.identify(token, extractor))
            .await
            .map_err(|_| Denial {
                stage: Stage::Resolving,
                reason: DenyReason::Timeout(self.timeout),
            })??;

        self.build(&principal.id, method_arn)
            .map(|response| response.with_context(principal.context))
            .map_err(Denial::at(Stage::Building))
    }

    async fn identify(
        &self,
        token: &str,
        extractor: &dyn PrincipalExtractor,
    ) -> Result<Principal, Denial> {
        let claims = self
            .verifier
            .verify(token)
            .map_err(DenyReason::from)
            .map_err(Denial::at(Stage::Verifying))?;

        PrincipalResolver
            .resolve(&claims, extractor)
            .await
            .map_err(DenyReason::from)
            .map_err(Denial::at(Stage::Resolving))
    }

    fn build(&self, principal_id: &str, method_arn: &str) -> Result<AuthorizerResponse, DenyReason> {
        let arn: MethodArn = method_arn.parse()?;
        let mut builder =
            PolicyBuilder::new(principal_id, arn.account_id.clone(), ApiOptions::from(&arn));

        if self.rules.is_empty() {
            builder.allow_all();
        } else {
            for rule in &self.rules {
                builder.add_rule(rule.clone())?;
            }
        }

        Ok(builder.build()?)
    }
}

fn log_denial(denial: &Denial) {
    let stage = denial.stage.as_str();
    match &denial.reason {
        // Builder failures point at a configuration bug, not at the caller.
        DenyReason::Policy(err) => {
            error!(stage, error = %err, "policy build failed, denying request")
        }
        reason => warn!(stage, error = %reason, "request denied"),
    }
}
