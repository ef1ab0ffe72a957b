mod codec;
mod config;
mod errors;
mod guard;
mod types;

pub use codec::SessionCodec;
pub use config::CookieSettings;
pub use errors::SessionError;
pub use guard::{authenticate_session, session_credentials};
pub use types::{
    AuthenticatedSession, CarriedSession, SameSite, SessionCredentials, SessionToken, UserId,
};

pub(crate) use config::SESSION_COOKIE_MAX_AGE;
