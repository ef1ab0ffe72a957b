use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

use crate::session::SameSite;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Generate `len` random bytes and return them base64url-encoded.
pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    Ok(base64url_encode(bytes))
}

/// Format a timestamp the way the `Expires` cookie attribute expects it.
pub(crate) fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Append one `Set-Cookie` header carrying the fixed session security attributes.
///
/// The value must already be safe for a cookie (see `urlencoding::encode`).
/// No `Domain` attribute is ever written.
pub(crate) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
    max_age: i64,
    same_site: SameSite,
) -> Result<(), UtilError> {
    if name.is_empty() {
        return Err(UtilError::Cookie("Cookie name is empty".to_string()));
    }
    let cookie = format!(
        "{name}={value}; SameSite={}; Secure; HttpOnly; Path=/; Max-Age={max_age}; Expires={}",
        same_site.as_str(),
        http_date(expires_at)
    );
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie(format!("Failed to parse cookie {name}")))?,
    );
    Ok(())
}
