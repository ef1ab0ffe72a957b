use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;

use account_session::{
    AuthResult, ExistsResponse, LoginRequest, ProfileFields, ProfileResponse, RegisterRequest,
    SuccessResponse, TokenCheckResponse, UpdateEmailRequest, check_token_core, exists_core,
    get_profile_core, login_core, logout_core, register_core, update_email_core,
    upsert_profile_core,
};

use super::error::IntoResponseError;
use super::session::{AccountState, SessionCookies};

type HandlerResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Create a router for the account endpoints
pub(super) fn router() -> Router<AccountState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/exists", get(exists))
        .route("/update_email", post(update_email))
        .route("/profile", get(get_profile).post(update_or_create_profile))
        .route("/check_token", get(check_token))
        .route("/logout", get(logout).post(logout))
}

async fn register(
    State(state): State<AccountState>,
    Json(payload): Json<RegisterRequest>,
) -> HandlerResult<impl IntoResponse> {
    let (auth, headers) = register_core(state.service(), state.codec(), payload)
        .await
        .into_response_error()?;
    Ok((headers, Json::<AuthResult>(auth)))
}

async fn login(
    State(state): State<AccountState>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResult<impl IntoResponse> {
    let (auth, headers) = login_core(state.service(), state.codec(), payload)
        .await
        .into_response_error()?;
    Ok((headers, Json::<AuthResult>(auth)))
}

#[derive(Deserialize)]
struct ExistsQuery {
    email: Option<String>,
}

async fn exists(
    State(state): State<AccountState>,
    Query(params): Query<ExistsQuery>,
) -> Json<ExistsResponse> {
    Json(exists_core(state.service(), params.email).await)
}

async fn update_email(
    State(state): State<AccountState>,
    Json(payload): Json<UpdateEmailRequest>,
) -> HandlerResult<Json<SuccessResponse>> {
    update_email_core(state.service(), payload)
        .await
        .map(Json)
        .into_response_error()
}

async fn update_or_create_profile(
    State(state): State<AccountState>,
    SessionCookies(session): SessionCookies,
    Json(fields): Json<ProfileFields>,
) -> HandlerResult<Json<ProfileResponse>> {
    upsert_profile_core(state.service(), &session, fields)
        .await
        .map(Json)
        .into_response_error()
}

async fn get_profile(
    State(state): State<AccountState>,
    SessionCookies(session): SessionCookies,
) -> HandlerResult<Json<ProfileResponse>> {
    get_profile_core(state.service(), &session)
        .await
        .map(Json)
        .into_response_error()
}

async fn check_token(
    State(state): State<AccountState>,
    SessionCookies(session): SessionCookies,
) -> HandlerResult<Json<TokenCheckResponse>> {
    check_token_core(state.service(), &session)
        .await
        .map(Json)
        .into_response_error()
}

#[derive(Deserialize)]
struct RedirectQuery {
    redirect: Option<String>,
}

/// Only same-origin paths are followed after logout
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}

/// Handles logout requests with optional redirection
///
/// Always clears the session cookies. With a local `redirect` path in the
/// query string the client is redirected there; otherwise the JSON body
/// `{"success": true}` is returned.
async fn logout(State(state): State<AccountState>, Query(params): Query<RedirectQuery>) -> Response {
    let (body, headers) = match logout_core(state.codec()).into_response_error() {
        Ok(cleared) => cleared,
        Err(err) => return err.into_response(),
    };

    match params.redirect.filter(|target| is_local_path(target)) {
        Some(redirect_to) => {
            tracing::debug!("Redirecting to {}", redirect_to);
            (headers, Redirect::to(&redirect_to)).into_response()
        }
        None => {
            tracing::debug!("No redirect specified, returning body");
            (headers, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_session::{CookieSettings, InMemoryAccountService, SameSite, SessionCodec};
    use axum::body::{Body, to_bytes};
    use http::{
        Request,
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let codec = SessionCodec::new(CookieSettings {
            token_name: "token".to_string(),
            uid_name: "uid".to_string(),
            email_name: "email".to_string(),
            max_age: 31_536_000,
            same_site: SameSite::Strict,
        });
        router().with_state(AccountState::with_codec(
            Arc::new(InMemoryAccountService::new()),
            codec,
        ))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/"));
        assert!(is_local_path("/home?x=1"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path(""));
    }

    #[tokio::test]
    async fn test_register_sets_cookies_and_returns_triad() {
        let response = app()
            .oneshot(post_json(
                "/register",
                json!({"email": "a@x.com", "passwordHash": "h1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 3);
        let body = body_json(response).await;
        assert_eq!(body["uid"], 1);
        assert_eq!(body["email"], "a@x.com");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_login_failure_sets_no_cookies() {
        let response = app()
            .oneshot(post_json(
                "/login",
                json!({"email": "nobody@x.com", "passwordHash": "h1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "invalid_credentials"})
        );
    }

    #[tokio::test]
    async fn test_register_missing_field_is_rejected() {
        let response = app()
            .oneshot(post_json("/register", json!({"email": "a@x.com"})))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_exists_without_email() {
        let response = app()
            .oneshot(Request::get("/exists").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"exists": false}));
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let response = app()
            .oneshot(Request::get("/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|c| c.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
        assert_eq!(body_json(response).await, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_logout_with_redirect() {
        let response = app()
            .oneshot(
                Request::post("/logout?redirect=/goodbye")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/goodbye");
        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 3);
    }

    #[tokio::test]
    async fn test_logout_ignores_foreign_redirect() {
        let response = app()
            .oneshot(
                Request::get("/logout?redirect=https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_profile_without_session_is_unauthorized() {
        let response = app()
            .oneshot(Request::get("/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "malformed_session");
    }
}
