use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::request::Parts;

use account_session::{
    AccountService, AuthenticatedSession, CarriedSession, CoordinationError, SessionCodec,
    SessionToken, UserId, authenticate_session,
};

use super::error::error_response;

/// Shared dependencies of the account endpoints
///
/// Handlers never read cookies themselves; they get the session through the
/// codec held here and validate it against the service held here.
#[derive(Clone)]
pub struct AccountState {
    pub(crate) service: Arc<dyn AccountService>,
    pub(crate) codec: Arc<SessionCodec>,
}

impl AccountState {
    /// State with cookie settings taken from the environment
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        Self::with_codec(service, SessionCodec::default())
    }

    pub fn with_codec(service: Arc<dyn AccountService>, codec: SessionCodec) -> Self {
        Self {
            service,
            codec: Arc::new(codec),
        }
    }

    pub fn service(&self) -> &dyn AccountService {
        self.service.as_ref()
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }
}

/// The session attributes carried by the request, undecided
///
/// Never rejects: a request without cookies yields an empty `CarriedSession`.
#[derive(Clone, Debug, Default)]
pub struct SessionCookies(pub CarriedSession);

impl<S> FromRequestParts<S> for SessionCookies
where
    AccountState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AccountState::from_ref(state);
        Ok(Self(state.codec.decode(&parts.headers)))
    }
}

/// Rejection produced when a session cannot be confirmed
#[derive(Debug)]
pub struct AuthRejection(pub(crate) CoordinationError);

impl AuthRejection {
    pub fn error(&self) -> &CoordinationError {
        &self.0
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        tracing::debug!("IntoResponse for AuthRejection: {}", self.0);
        error_response(self.0)
    }
}

/// Authenticated session, available as an Axum extractor
///
/// Decodes the session cookies and has the Account Service confirm that the
/// token belongs to the carried uid. If `is_authenticated_401` already
/// confirmed the session for this request, that result is reused.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use account_session_axum::{AccountState, AuthSession};
///
/// async fn protected_handler(session: AuthSession) -> String {
///     format!("Hello, user {}!", session.uid)
/// }
///
/// fn app(state: AccountState) -> Router {
///     Router::new()
///         .route("/protected", get(protected_handler))
///         .with_state(state)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthSession {
    /// Account identifier confirmed on this request
    pub uid: UserId,
    /// Email as carried by the client; may be stale
    pub email: Option<String>,
    token: SessionToken,
}

impl AuthSession {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

impl From<AuthenticatedSession> for AuthSession {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            uid: session.uid,
            email: session.email,
            token: session.token,
        }
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    AccountState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(confirmed) = parts.extensions.get::<AuthenticatedSession>() {
            return Ok(confirmed.clone().into());
        }

        let state = AccountState::from_ref(state);
        let session = state.codec.decode(&parts.headers);

        authenticate_session(state.service.as_ref(), &session)
            .await
            .map(Self::from)
            .map_err(|e| AuthRejection(CoordinationError::from(e).log()))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthSession
where
    AccountState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    /// Anonymous requests yield `None`; downstream failures still reject
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthSession as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(session) => Ok(Some(session)),
            Err(AuthRejection(
                CoordinationError::MalformedSession(_) | CoordinationError::Unauthenticated,
            )) => Ok(None),
            Err(rejection) => Err(rejection),
        }
    }
}
