/*
 * Responsibility
 * - Gateway の TOKEN authorizer event (request DTO)
 * - response は services::auth::policy::AuthorizerResponse をそのまま返す
 */
use serde::Deserialize;

pub const TOKEN_EVENT_TYPE: &str = "TOKEN";

/// Request body for `/authorize`.
///
/// `{ "type": "TOKEN", "authorizationToken": "Bearer ...", "methodArn": "arn:aws:execute-api:..." }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,

    /// Raw header value; a missing token is treated as empty (and rejected later).
    #[serde(default)]
    pub authorization_token: Option<String>,

    #[serde(default)]
    pub method_arn: String,
}

impl AuthorizeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.event_type.as_deref() {
            None | Some(TOKEN_EVENT_TYPE) => Ok(()),
            Some(_) => Err("only TOKEN authorizer events are supported"),
        }
    }

    /// Token with an optional `Bearer ` scheme prefix removed.
    pub fn bearer_token(&self) -> &str {
        let raw = self.authorization_token.as_deref().unwrap_or_default().trim();
        raw.strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .map(str::trim)
            .unwrap_or(raw)
    }
}
