use crate::account::{AccountService, AccountServiceError};

use super::errors::SessionError;
use super::types::{AuthenticatedSession, CarriedSession, SessionCredentials, SessionToken, UserId};

/// Structural check of the carried session, without contacting the Account Service
///
/// Fails with `MalformedSession` when the uid is absent or not an integer, or
/// when the token is absent or empty. The email attribute is never required.
pub fn session_credentials(session: &CarriedSession) -> Result<SessionCredentials, SessionError> {
    let raw_uid = session
        .uid
        .as_deref()
        .ok_or_else(|| SessionError::MalformedSession("uid attribute is missing".to_string()))?;

    let uid = raw_uid.parse::<UserId>().map_err(|_| {
        SessionError::MalformedSession("uid attribute is not an integer".to_string())
    })?;

    let token = session
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SessionError::MalformedSession("token attribute is missing".to_string()))?;

    Ok(SessionCredentials {
        uid,
        token: SessionToken::new(token),
    })
}

/// Re-derive the caller's identity and have the Account Service confirm it
///
/// Runs on every protected request; nothing is cached. The carried uid is only
/// returned when the service confirms that the token was issued to that uid.
#[tracing::instrument(skip_all)]
pub async fn authenticate_session(
    service: &dyn AccountService,
    session: &CarriedSession,
) -> Result<AuthenticatedSession, SessionError> {
    let SessionCredentials { uid, token } = session_credentials(session).inspect_err(|e| {
        tracing::debug!("Rejecting session before validation: {}", e);
    })?;

    let check = match service.check_token(uid, &token).await {
        Ok(check) => check,
        Err(AccountServiceError::Rejected(rejection)) => {
            tracing::warn!("Token check for uid {} rejected: {}", uid, rejection);
            return Err(SessionError::Unauthenticated);
        }
        Err(AccountServiceError::Unavailable(msg)) => {
            tracing::error!("Token check for uid {} failed: {}", uid, msg);
            return Err(SessionError::Downstream(msg));
        }
    };

    if !(check.success && check.user_token_ok) {
        tracing::warn!("Session for uid {} is not valid", uid);
        return Err(SessionError::Unauthenticated);
    }

    tracing::debug!("Session for uid {} confirmed", uid);
    Ok(AuthenticatedSession {
        uid,
        token,
        email: session.email.clone(),
    })
}
