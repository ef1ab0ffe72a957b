use std::sync::LazyLock;

use super::types::SameSite;

/// Upper bound on the session lifetime
pub(super) const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

pub(super) static SESSION_TOKEN_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    cookie_name_from(std::env::var("SESSION_TOKEN_COOKIE_NAME").ok(), "token")
});

pub(super) static SESSION_UID_COOKIE_NAME: LazyLock<String> =
    LazyLock::new(|| cookie_name_from(std::env::var("SESSION_UID_COOKIE_NAME").ok(), "uid"));

pub(super) static SESSION_EMAIL_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    cookie_name_from(std::env::var("SESSION_EMAIL_COOKIE_NAME").ok(), "email")
});

pub(crate) static SESSION_COOKIE_MAX_AGE: LazyLock<u64> =
    LazyLock::new(|| max_age_from(std::env::var("SESSION_COOKIE_MAX_AGE").ok()));

pub(super) static SESSION_COOKIE_SAME_SITE: LazyLock<SameSite> =
    LazyLock::new(|| same_site_from(std::env::var("SESSION_COOKIE_SAME_SITE").ok()));

fn cookie_name_from(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn max_age_from(value: Option<String>) -> u64 {
    let max_age = value
        .and_then(|s| s.parse().ok())
        .unwrap_or(ONE_YEAR_SECS);
    if max_age > ONE_YEAR_SECS {
        tracing::warn!(
            "SESSION_COOKIE_MAX_AGE {} exceeds one year, clamping to {}",
            max_age,
            ONE_YEAR_SECS
        );
        return ONE_YEAR_SECS;
    }
    max_age
}

fn same_site_from(value: Option<String>) -> SameSite {
    match value {
        None => SameSite::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}, falling back to {}", SameSite::default());
            SameSite::default()
        }),
    }
}

/// Names and attributes of the three session cookies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub token_name: String,
    pub uid_name: String,
    pub email_name: String,
    /// Lifetime in seconds; anything above one year is written as one year
    pub max_age: u64,
    pub same_site: SameSite,
}

impl CookieSettings {
    /// Snapshot of the environment-driven settings
    pub fn from_env() -> Self {
        Self {
            token_name: SESSION_TOKEN_COOKIE_NAME.clone(),
            uid_name: SESSION_UID_COOKIE_NAME.clone(),
            email_name: SESSION_EMAIL_COOKIE_NAME.clone(),
            max_age: *SESSION_COOKIE_MAX_AGE,
            same_site: *SESSION_COOKIE_SAME_SITE,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::from_env()
    }
}
