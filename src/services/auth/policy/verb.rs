use std::{fmt, str::FromStr};

use serde::Deserialize;

use super::error::PolicyError;

/// HTTP verbs supported by the gateway for method ARNs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
    Options,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 7] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Head,
        HttpVerb::Delete,
        HttpVerb::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verb slot of a method rule: a concrete verb or the `*` wildcard.
///
/// Parsing is case-sensitive (`get` is rejected), matching what the gateway
/// accepts in resource ARNs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum MethodVerb {
    Any,
    Verb(HttpVerb),
}

impl MethodVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodVerb::Any => "*",
            MethodVerb::Verb(v) => v.as_str(),
        }
    }
}

impl fmt::Display for MethodVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpVerb> for MethodVerb {
    fn from(verb: HttpVerb) -> Self {
        MethodVerb::Verb(verb)
    }
}

impl FromStr for MethodVerb {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(MethodVerb::Any);
        }
        HttpVerb::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .map(|v| MethodVerb::Verb(*v))
            .ok_or_else(|| PolicyError::InvalidVerb(s.to_string()))
    }
}

impl TryFrom<String> for MethodVerb {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
