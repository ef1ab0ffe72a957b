//! Error types for the coordination layer

use thiserror::Error;

use crate::account::{AccountServiceError, Rejection};
use crate::session::SessionError;

/// Errors surfaced by the handler core functions
///
/// `DownstreamFailure` carries no detail. The underlying cause is
/// logged where it is converted and never reaches the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinationError {
    /// Session attributes missing or carrying a non-numeric uid
    #[error("Malformed session: {0}")]
    MalformedSession(String),

    /// Well-formed session that failed validation
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Outcome reported by the Account Service, relayed unchanged
    #[error("Rejected: {0}")]
    Rejected(Rejection),

    /// Account Service unreachable or failing internally
    #[error("Account service failure")]
    DownstreamFailure,

    /// Error from Session operations
    #[error("Session error: {0}")]
    Session(SessionError),
}

impl CoordinationError {
    /// Log the error and return self
    ///
    /// Client-caused outcomes are logged at warn level, server-side failures at error.
    pub fn log(self) -> Self {
        match &self {
            Self::MalformedSession(msg) => tracing::warn!("Malformed session: {}", msg),
            Self::Unauthenticated => tracing::warn!("Unauthenticated session"),
            Self::Rejected(rejection) => tracing::warn!("Rejected: {}", rejection),
            Self::DownstreamFailure => tracing::error!("Account service failure"),
            Self::Session(err) => tracing::error!("Session error: {}", err),
        }
        self
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MalformedSession(msg) => Self::MalformedSession(msg),
            SessionError::Unauthenticated => Self::Unauthenticated,
            SessionError::Downstream(msg) => {
                tracing::error!("Account service failure during session check: {}", msg);
                Self::DownstreamFailure
            }
            other => Self::Session(other),
        }
    }
}

impl From<AccountServiceError> for CoordinationError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::Rejected(rejection) => Self::Rejected(rejection),
            AccountServiceError::Unavailable(msg) => {
                tracing::error!("Account service failure: {}", msg);
                Self::DownstreamFailure
            }
        }
    }
}
