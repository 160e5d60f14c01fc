/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, JWT 検証設定, ルールファイルなど)
 * - 設定値のバリデーション (不正なら起動失敗)
 * - 秘密鍵そのものは持たない (SecretProvider 経由で解決する)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::principal::DEFAULT_PRINCIPAL_CLAIM;
use crate::services::auth::token::TokenPolicy;

pub const JWT_SECRET_NAME: &str = "JWT_SECRET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Name looked up through the SecretProvider; the value never lives here.
    pub jwt_secret_name: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_seconds: u64,
    pub jwt_require_exp: bool,

    pub principal_claim: String,
    pub policy_rules_path: Option<PathBuf>,
    pub authorize_timeout: Duration,

    pub request_body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            app_env: AppEnv::Development,
            jwt_secret_name: JWT_SECRET_NAME.to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            jwt_leeway_seconds: 0,
            jwt_require_exp: false,
            principal_claim: DEFAULT_PRINCIPAL_CLAIM.to_string(),
            policy_rules_path: None,
            authorize_timeout: Duration::from_millis(3000),
            request_body_limit_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let jwt_secret_name = non_empty("JWT_SECRET_NAME").unwrap_or(defaults.jwt_secret_name);
        let jwt_issuer = non_empty("JWT_ISSUER");
        let jwt_audience = non_empty("JWT_AUDIENCE");

        let jwt_leeway_seconds = std::env::var("JWT_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.jwt_leeway_seconds);

        let jwt_require_exp = match non_empty("JWT_REQUIRE_EXP") {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid("JWT_REQUIRE_EXP"))?,
            None => defaults.jwt_require_exp,
        };

        let principal_claim = non_empty("PRINCIPAL_CLAIM").unwrap_or(defaults.principal_claim);

        let policy_rules_path = non_empty("POLICY_RULES_PATH").map(PathBuf::from);

        let authorize_timeout = match non_empty("AUTHORIZE_TIMEOUT_MS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid("AUTHORIZE_TIMEOUT_MS"))?,
            None => defaults.authorize_timeout,
        };

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.request_body_limit_bytes);

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let config = Self {
            addr,
            app_env,
            jwt_secret_name,
            jwt_issuer,
            jwt_audience,
            jwt_leeway_seconds,
            jwt_require_exp,
            principal_claim,
            policy_rules_path,
            authorize_timeout,
            request_body_limit_bytes,
            request_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// The HTTP timeout must outlast the authorize deadline, otherwise a slow
    /// lookup surfaces as a timeout response instead of `Unauthorized`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout <= self.authorize_timeout {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }
        Ok(())
    }

    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
            leeway_seconds: self.jwt_leeway_seconds,
            require_exp: self.jwt_require_exp,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
