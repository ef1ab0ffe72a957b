use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session attributes missing, empty, or carrying a non-numeric uid
    #[error("Malformed session: {0}")]
    MalformedSession(String),

    /// Well-formed session that the Account Service did not accept
    #[error("Session is not authenticated")]
    Unauthenticated,

    /// The Account Service could not be reached or failed internally
    #[error("Downstream failure: {0}")]
    Downstream(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
