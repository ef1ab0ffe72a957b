//! account_session - Session transport and validation for account endpoints
//!
//! This crate turns an Account Service authentication result into a browser
//! session made of three cookies (token, uid, email), re-validates that session
//! on protected operations, and tears it down on logout. Credential checks,
//! persistence and token issuance stay behind the [`AccountService`] trait.

mod account;
mod config;
mod coordination;
mod session;
mod utils;

#[cfg(test)]
mod test_utils;

pub use account::{
    AccountService, AccountServiceError, AuthResult, ExistsResponse, InMemoryAccountService,
    LoginRequest, ProfileFields, ProfileResponse, RegisterRequest, Rejection, SuccessResponse,
    TokenCheckResponse, UpdateEmailRequest, UserInfo,
};

pub use coordination::{
    CoordinationError, check_token_core, exists_core, get_profile_core, login_core, logout_core,
    register_core, update_email_core, upsert_profile_core,
};

// Re-export the route prefix
pub use config::ACCOUNT_ROUTE_PREFIX;

pub use session::{
    AuthenticatedSession, CarriedSession, CookieSettings, SameSite, SessionCodec,
    SessionCredentials, SessionError, SessionToken, UserId, authenticate_session,
    session_credentials,
};

pub use utils::UtilError;
