//! Router for all account endpoints

use std::sync::Arc;

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use account_session::AccountService;

use super::session::AccountState;

/// Create a router for all account endpoints
///
/// Mount it under `ACCOUNT_ROUTE_PREFIX`. The endpoints are:
/// - POST {prefix}/register
/// - POST {prefix}/login
/// - GET  {prefix}/exists?email=...
/// - POST {prefix}/update_email
/// - GET|POST {prefix}/profile
/// - GET  {prefix}/check_token
/// - GET|POST {prefix}/logout
pub fn account_router(service: Arc<dyn AccountService>) -> Router {
    account_router_no_trace(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `account_router()` but without the HTTP tracing middleware
pub fn account_router_no_trace(service: Arc<dyn AccountService>) -> Router {
    super::account::router().with_state(AccountState::new(service))
}
