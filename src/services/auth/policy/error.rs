use thiserror::Error;

/// Builder-side failures.
///
/// These are caller-programming or configuration errors rather than request-driven
/// ones, but they still end in a denied request at the authorizer boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("invalid HTTP verb '{0}' (expected one of GET, POST, PUT, PATCH, HEAD, DELETE, OPTIONS or '*')")]
    InvalidVerb(String),
    #[error("invalid resource path '{0}' (expected to match ^[/.a-zA-Z0-9-*]+$)")]
    InvalidResourcePath(String),
    #[error("no statements defined for the policy")]
    EmptyPolicy,
}
