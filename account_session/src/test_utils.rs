//! Test doubles shared by the unit tests of this crate

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::account::{
    AccountService, AccountServiceError, AuthResult, ExistsResponse, LoginRequest, ProfileFields,
    ProfileResponse, RegisterRequest, SuccessResponse, TokenCheckResponse, UpdateEmailRequest,
    UserInfo,
};
use crate::session::{CarriedSession, SessionToken, UserId};

pub(crate) fn carried(token: Option<&str>, uid: Option<&str>, email: Option<&str>) -> CarriedSession {
    CarriedSession {
        token: token.map(str::to_string),
        uid: uid.map(str::to_string),
        email: email.map(str::to_string),
    }
}

/// Account Service that only knows a fixed set of (token -> uid) bindings
///
/// Counts `check_token` calls so tests can assert that nothing is cached.
#[derive(Default)]
pub(crate) struct StubAccountService {
    tokens: Mutex<HashMap<String, UserId>>,
    check_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl StubAccountService {
    pub(crate) fn with_token(uid: i64, token: &str) -> Self {
        let stub = Self::default();
        stub.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), UserId::new(uid));
        stub
    }

    pub(crate) fn revoke(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }

    pub(crate) fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    fn owns(&self, uid: UserId, token: &SessionToken) -> bool {
        self.tokens.lock().unwrap().get(token.as_str()) == Some(&uid)
    }

    fn profile_for(&self, uid: UserId, token: &SessionToken) -> ProfileResponse {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if !self.owns(uid, token) {
            return ProfileResponse::rejected();
        }
        ProfileResponse {
            success: true,
            user_info: Some(UserInfo {
                uid,
                email: format!("user{uid}@x.com"),
                profile: ProfileFields::default(),
            }),
        }
    }
}

fn unsupported() -> AccountServiceError {
    AccountServiceError::Unavailable("not supported by stub".to_string())
}

#[async_trait]
impl AccountService for StubAccountService {
    async fn register(&self, _: RegisterRequest) -> Result<AuthResult, AccountServiceError> {
        Err(unsupported())
    }

    async fn login(&self, _: LoginRequest) -> Result<AuthResult, AccountServiceError> {
        Err(unsupported())
    }

    async fn exists_by_email(&self, _: &str) -> Result<ExistsResponse, AccountServiceError> {
        Err(unsupported())
    }

    async fn update_email(
        &self,
        _: UpdateEmailRequest,
    ) -> Result<SuccessResponse, AccountServiceError> {
        Err(unsupported())
    }

    async fn upsert_profile(
        &self,
        _: ProfileFields,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Ok(self.profile_for(uid, token))
    }

    async fn get_profile(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Ok(self.profile_for(uid, token))
    }

    async fn check_token(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<TokenCheckResponse, AccountServiceError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenCheckResponse {
            success: true,
            user_token_ok: self.owns(uid, token),
        })
    }
}

/// Account Service that is never reachable
pub(crate) struct UnavailableAccountService;

fn connection_refused() -> AccountServiceError {
    AccountServiceError::Unavailable("connection refused to 10.0.0.5:5432".to_string())
}

#[async_trait]
impl AccountService for UnavailableAccountService {
    async fn register(&self, _: RegisterRequest) -> Result<AuthResult, AccountServiceError> {
        Err(connection_refused())
    }

    async fn login(&self, _: LoginRequest) -> Result<AuthResult, AccountServiceError> {
        Err(connection_refused())
    }

    async fn exists_by_email(&self, _: &str) -> Result<ExistsResponse, AccountServiceError> {
        Err(connection_refused())
    }

    async fn update_email(
        &self,
        _: UpdateEmailRequest,
    ) -> Result<SuccessResponse, AccountServiceError> {
        Err(connection_refused())
    }

    async fn upsert_profile(
        &self,
        _: ProfileFields,
        _: UserId,
        _: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Err(connection_refused())
    }

    async fn get_profile(
        &self,
        _: UserId,
        _: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Err(connection_refused())
    }

    async fn check_token(
        &self,
        _: UserId,
        _: &SessionToken,
    ) -> Result<TokenCheckResponse, AccountServiceError> {
        Err(connection_refused())
    }
}
