use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer identifier of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accepts only the canonical decimal form: ASCII digits with an optional leading `-`
impl FromStr for UserId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Not a decimal integer: {s:?}"));
        }
        s.parse().map(Self).map_err(|e| format!("Invalid user id {s:?}: {e}"))
    }
}

/// Opaque session token issued by the Account Service
///
/// `Debug` never prints the value so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Cross-site policy written on every session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("Unknown SameSite value: {other}")),
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session attributes exactly as carried by a request, before any validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarriedSession {
    pub token: Option<String>,
    pub uid: Option<String>,
    pub email: Option<String>,
}

impl CarriedSession {
    /// True when the request carries none of the three attributes
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.uid.is_none() && self.email.is_none()
    }
}

/// Structurally valid (uid, token) pair, not yet confirmed by the Account Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub uid: UserId,
    pub token: SessionToken,
}

/// Session confirmed by the Account Service on this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub uid: UserId,
    pub token: SessionToken,
    /// Advisory echo of the carried email; never an authorization input
    pub email: Option<String>,
}
