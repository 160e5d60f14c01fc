//! Parsing of the gateway's invocation descriptor (`methodArn`).
//!
//! Shape: `arn:{partition}:execute-api:{region}:{accountId}:{apiId}/{stage}/{verb}/{resource...}`

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodArnError {
    #[error("method ARN must have 6 ':'-separated parts, got {0}")]
    WrongPartCount(usize),
    #[error("method ARN must start with 'arn'")]
    NotAnArn,
    #[error("method ARN service must be 'execute-api', got '{0}'")]
    WrongService(String),
    #[error("method ARN is missing the account id")]
    MissingAccountId,
    #[error("method ARN path must be apiId/stage/verb[/resource], got '{0}'")]
    InvalidPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArn {
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub api_id: String,
    pub stage: String,
    pub verb: String,
    // Resource path without the leading '/', may be empty for the root resource.
    pub resource: String,
}

impl FromStr for MethodArn {
    type Err = MethodArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The resource path may itself contain ':'.
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 {
            return Err(MethodArnError::WrongPartCount(parts.len()));
        }
        if parts[0] != "arn" {
            return Err(MethodArnError::NotAnArn);
        }
        if parts[2] != "execute-api" {
            return Err(MethodArnError::WrongService(parts[2].to_string()));
        }
        if parts[4].is_empty() {
            return Err(MethodArnError::MissingAccountId);
        }

        let mut path = parts[5].splitn(4, '/');
        let (Some(api_id), Some(stage), Some(verb)) = (path.next(), path.next(), path.next())
        else {
            return Err(MethodArnError::InvalidPath(parts[5].to_string()));
        };
        let resource = path.next().unwrap_or_default();

        Ok(Self {
            partition: parts[1].to_string(),
            region: parts[3].to_string(),
            account_id: parts[4].to_string(),
            api_id: api_id.to_string(),
            stage: stage.to_string(),
            verb: verb.to_string(),
            resource: resource.to_string(),
        })
    }
}
