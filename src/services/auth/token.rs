use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

/// Decoded payload of a verified token.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Verification failure.
///
/// The cause (bad signature, expiry, malformed input, ...) is logged by the
/// verifier and deliberately not carried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,
    #[error("verification secret is empty")]
    EmptySecret,
}

/// Claim checks applied on top of the signature check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPolicy {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
    // When false, `exp` is only checked if the token carries one.
    pub require_exp: bool,
}

/// Shared-secret (HMAC) JWT verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, policy: &TokenPolicy) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = policy.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        validation.required_spec_claims.clear();
        if policy.require_exp {
            validation.required_spec_claims.insert("exp".to_string());
        }

        if let Some(issuer) = policy.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        match policy.audience.as_deref() {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            // jsonwebtoken rejects any `aud` claim when no audience is configured.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature + time/issuer/audience claims and return the payload.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            warn!("empty bearer token");
            return Err(TokenError::InvalidToken);
        }

        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "token verification failed");
                Err(TokenError::InvalidToken)
            }
        }
    }
}

/// Short, non-reversible token identifier for log correlation.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded[..12].to_string()
}
