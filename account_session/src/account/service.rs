use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::session::{SessionToken, UserId};

use super::types::{
    AuthResult, ExistsResponse, LoginRequest, ProfileFields, ProfileResponse, RegisterRequest,
    SuccessResponse, TokenCheckResponse, UpdateEmailRequest,
};

/// Domain rejections decided by the Account Service and relayed unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid credential format")]
    InvalidCredentialFormat,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email is already in use")]
    EmailInUse,
}

impl Rejection {
    /// Stable machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            Rejection::DuplicateEmail => "duplicate_email",
            Rejection::InvalidCredentialFormat => "invalid_credential_format",
            Rejection::InvalidCredentials => "invalid_credentials",
            Rejection::EmailInUse => "email_in_use",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountServiceError {
    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Unreachable, timed out, or failed internally
    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

/// Owner of credential verification, persistence and token lifecycle
///
/// Implementations are shared across requests, so they must be `Send + Sync`.
#[async_trait]
pub trait AccountService: Send + Sync + 'static {
    async fn register(&self, request: RegisterRequest) -> Result<AuthResult, AccountServiceError>;

    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AccountServiceError>;

    /// Implementations should answer `exists: true` when they cannot tell.
    async fn exists_by_email(&self, email: &str) -> Result<ExistsResponse, AccountServiceError>;

    async fn update_email(
        &self,
        request: UpdateEmailRequest,
    ) -> Result<SuccessResponse, AccountServiceError>;

    /// Performs its own token check; answers `success: false` when it fails.
    async fn upsert_profile(
        &self,
        fields: ProfileFields,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError>;

    async fn get_profile(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError>;

    async fn check_token(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<TokenCheckResponse, AccountServiceError>;
}
