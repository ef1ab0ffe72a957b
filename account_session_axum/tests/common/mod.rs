//! Shared helpers for the HTTP-level tests
//!
//! `MockBrowser` keeps a cookie jar the way a browser would: every
//! `Set-Cookie` on a response replaces the stored value for that name, and the
//! whole jar is sent back on the next request.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use account_session_axum::{AccountService, account_router_no_trace};
use axum::{
    Router,
    body::{Body, to_bytes},
    response::Response,
};
use http::{
    Request, StatusCode,
    header::{CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE},
};
use serde_json::Value;
use tower::ServiceExt;

pub mod failing_service;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Self {
            status,
            headers,
            body,
        }
    }

    /// Raw `Set-Cookie` lines of the response
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

pub struct MockBrowser {
    app: Router,
    jar: Mutex<BTreeMap<String, String>>,
}

impl MockBrowser {
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        Self {
            app: account_router_no_trace(service),
            jar: Mutex::new(BTreeMap::new()),
        }
    }

    /// A second browser talking to the same backend, starting with `jar`
    pub fn with_jar(service: Arc<dyn AccountService>, jar: BTreeMap<String, String>) -> Self {
        Self {
            app: account_router_no_trace(service),
            jar: Mutex::new(jar),
        }
    }

    pub fn jar(&self) -> BTreeMap<String, String> {
        self.jar.lock().unwrap().clone()
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.jar.lock().unwrap().get(name).cloned()
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.jar
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = self.with_cookies(Request::get(uri)).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        let request = self
            .with_cookies(Request::post(uri))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    fn with_cookies(&self, builder: http::request::Builder) -> http::request::Builder {
        let cookies = self
            .jar
            .lock()
            .unwrap()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        if cookies.is_empty() {
            builder
        } else {
            builder.header(COOKIE, cookies)
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let response = TestResponse::from_response(response).await;
        self.store(&response);
        response
    }

    fn store(&self, response: &TestResponse) {
        let mut jar = self.jar.lock().unwrap();
        for line in response.set_cookies() {
            let pair = line.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                jar.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }
}
