use axum::{Router, middleware::from_fn_with_state, routing::get};

use account_session_axum::{AccountState, AuthSession, is_authenticated_401};

pub(super) fn router(state: AccountState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route(
            "/protected",
            get(protected).route_layer(from_fn_with_state(state.clone(), is_authenticated_401)),
        )
        .with_state(state)
}

// Guarded by the middleware; the extractor reuses its result
async fn protected(session: AuthSession) -> String {
    format!("Hello, user {}!", session.uid)
}

// Works for anonymous visitors too
async fn whoami(session: Option<AuthSession>) -> String {
    match session {
        Some(session) => format!(
            "Signed in as uid {} ({})",
            session.uid,
            session.email.as_deref().unwrap_or("no email")
        ),
        None => "Not signed in".to_string(),
    }
}
