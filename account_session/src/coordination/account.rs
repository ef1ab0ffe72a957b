use http::HeaderMap;

use crate::account::{
    AccountService, AuthResult, ExistsResponse, LoginRequest, ProfileFields, ProfileResponse,
    RegisterRequest, SuccessResponse, TokenCheckResponse, UpdateEmailRequest,
};
use crate::session::{CarriedSession, SessionCodec, authenticate_session, session_credentials};

use super::errors::CoordinationError;

/// Register an account and write the new session triad
#[tracing::instrument(skip_all)]
pub async fn register_core(
    service: &dyn AccountService,
    codec: &SessionCodec,
    request: RegisterRequest,
) -> Result<(AuthResult, HeaderMap), CoordinationError> {
    let auth = service
        .register(request)
        .await
        .map_err(|e| CoordinationError::from(e).log())?;
    let headers = codec
        .encode(&auth)
        .map_err(|e| CoordinationError::from(e).log())?;

    tracing::debug!("Registered uid {} and issued session", auth.uid);
    Ok((auth, headers))
}

/// Log in and write the new session triad
#[tracing::instrument(skip_all)]
pub async fn login_core(
    service: &dyn AccountService,
    codec: &SessionCodec,
    request: LoginRequest,
) -> Result<(AuthResult, HeaderMap), CoordinationError> {
    let auth = service
        .login(request)
        .await
        .map_err(|e| CoordinationError::from(e).log())?;
    let headers = codec
        .encode(&auth)
        .map_err(|e| CoordinationError::from(e).log())?;

    tracing::debug!("Logged in uid {}", auth.uid);
    Ok((auth, headers))
}

/// Look up whether an email is registered
///
/// A missing email is looked up as the empty string. Any failure of the
/// Account Service answers `exists: true` so a caller never registers into an
/// uncertain state.
#[tracing::instrument(skip_all)]
pub async fn exists_core(service: &dyn AccountService, email: Option<String>) -> ExistsResponse {
    let email = email.unwrap_or_default();
    match service.exists_by_email(&email).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Existence check failed, reporting exists: {}", e);
            ExistsResponse { exists: true }
        }
    }
}

/// Change the email on the account record
///
/// The carried session is left as is: its email attribute is advisory and is
/// only refreshed by the next login.
#[tracing::instrument(skip_all)]
pub async fn update_email_core(
    service: &dyn AccountService,
    request: UpdateEmailRequest,
) -> Result<SuccessResponse, CoordinationError> {
    service
        .update_email(request)
        .await
        .map_err(|e| CoordinationError::from(e).log())
}

/// Update or create the profile of the session's account
#[tracing::instrument(skip_all)]
pub async fn upsert_profile_core(
    service: &dyn AccountService,
    session: &CarriedSession,
    fields: ProfileFields,
) -> Result<ProfileResponse, CoordinationError> {
    let auth = authenticate_session(service, session)
        .await
        .map_err(|e| CoordinationError::from(e).log())?;

    service
        .upsert_profile(fields, auth.uid, &auth.token)
        .await
        .map_err(|e| CoordinationError::from(e).log())
}

/// Read the profile of the session's account
#[tracing::instrument(skip_all)]
pub async fn get_profile_core(
    service: &dyn AccountService,
    session: &CarriedSession,
) -> Result<ProfileResponse, CoordinationError> {
    let auth = authenticate_session(service, session)
        .await
        .map_err(|e| CoordinationError::from(e).log())?;

    service
        .get_profile(auth.uid, &auth.token)
        .await
        .map_err(|e| CoordinationError::from(e).log())
}

/// Ask the Account Service whether the carried session is still valid
///
/// Malformed sessions are rejected here; a well-formed session gets the
/// service's answer relayed verbatim.
#[tracing::instrument(skip_all)]
pub async fn check_token_core(
    service: &dyn AccountService,
    session: &CarriedSession,
) -> Result<TokenCheckResponse, CoordinationError> {
    let credentials =
        session_credentials(session).map_err(|e| CoordinationError::from(e).log())?;

    service
        .check_token(credentials.uid, &credentials.token)
        .await
        .map_err(|e| CoordinationError::from(e).log())
}

/// Clear the session triad
///
/// Succeeds whether or not a session existed.
#[tracing::instrument(skip_all)]
pub fn logout_core(codec: &SessionCodec) -> Result<(SuccessResponse, HeaderMap), CoordinationError> {
    let headers = codec
        .clear()
        .map_err(|e| CoordinationError::from(e).log())?;
    Ok((SuccessResponse { success: true }, headers))
}
