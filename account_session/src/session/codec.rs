use chrono::{DateTime, Duration, Utc};
use headers::{Cookie, HeaderMapExt};
use http::HeaderMap;

use crate::account::AuthResult;
use crate::utils::header_set_cookie;

use super::config::{CookieSettings, ONE_YEAR_SECS};
use super::errors::SessionError;
use super::types::CarriedSession;

/// Converts between an authentication result and the session cookies.
///
/// The codec holds no server-side state. `encode` and `clear` build a fresh
/// `HeaderMap` and either return every `Set-Cookie` header or none of them.
#[derive(Debug, Clone, Default)]
pub struct SessionCodec {
    settings: CookieSettings,
}

impl SessionCodec {
    pub fn new(settings: CookieSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CookieSettings {
        &self.settings
    }

    /// Write the session triad for a successful registration or login
    pub fn encode(&self, auth: &AuthResult) -> Result<HeaderMap, SessionError> {
        let max_age = i64::try_from(self.settings.max_age.min(ONE_YEAR_SECS))
            .map_err(|_| SessionError::Cookie("Cookie max age out of range".to_string()))?;
        let expires_at = Duration::try_seconds(max_age)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| SessionError::Cookie("Cookie max age out of range".to_string()))?;
        let uid = auth.uid.to_string();

        self.write_triad(
            [auth.token.as_str(), uid.as_str(), auth.email.as_str()],
            expires_at,
            max_age,
        )
    }

    /// Overwrite the session triad with empty, already-expired cookies
    pub fn clear(&self) -> Result<HeaderMap, SessionError> {
        let epoch = DateTime::<Utc>::from_timestamp(0, 0)
            .ok_or_else(|| SessionError::Cookie("Invalid expiry timestamp".to_string()))?;
        self.write_triad(["", "", ""], epoch, 0)
    }

    /// Read whatever session attributes the request carries
    ///
    /// Missing and empty attributes both decode to `None`.
    pub fn decode(&self, headers: &HeaderMap) -> CarriedSession {
        let Some(cookies) = headers.typed_get::<Cookie>() else {
            tracing::debug!("No cookie header found");
            return CarriedSession::default();
        };

        let read = |name: &str| {
            let raw = cookies.get(name).filter(|v| !v.is_empty())?;
            match urlencoding::decode(raw) {
                Ok(value) => Some(value.into_owned()),
                Err(e) => {
                    tracing::warn!("Ignoring undecodable cookie {}: {}", name, e);
                    None
                }
            }
        };

        CarriedSession {
            token: read(&self.settings.token_name),
            uid: read(&self.settings.uid_name),
            email: read(&self.settings.email_name),
        }
    }

    fn write_triad(
        &self,
        [token, uid, email]: [&str; 3],
        expires_at: DateTime<Utc>,
        max_age: i64,
    ) -> Result<HeaderMap, SessionError> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (&self.settings.token_name, token),
            (&self.settings.uid_name, uid),
            (&self.settings.email_name, email),
        ] {
            header_set_cookie(
                &mut headers,
                name,
                &urlencoding::encode(value),
                expires_at,
                max_age,
                self.settings.same_site,
            )?;
        }
        Ok(headers)
    }
}
