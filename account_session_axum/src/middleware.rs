use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use account_session::{CoordinationError, authenticate_session};

use super::error::error_response;
use super::session::AccountState;

// Authentication checker with 401 response
//
// Install with `axum::middleware::from_fn_with_state(state, is_authenticated_401)`.
// On success the confirmed `AuthenticatedSession` is stored in the request
// extensions, where `AuthSession` picks it up without a second service call.
pub async fn is_authenticated_401(
    State(state): State<AccountState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = state.codec().decode(req.headers());

    match authenticate_session(state.service(), &session).await {
        Ok(confirmed) => {
            tracing::debug!("Session confirmed for uid {}", confirmed.uid);
            req.extensions_mut().insert(confirmed);
            next.run(req).await
        }
        Err(err) => error_response(CoordinationError::from(err).log()),
    }
}
