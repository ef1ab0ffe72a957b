mod account;
mod error;
mod middleware;
mod router;
mod session;

pub use error::IntoResponseError;
pub use middleware::is_authenticated_401;
pub use router::{account_router, account_router_no_trace};
pub use session::{AccountState, AuthRejection, AuthSession, SessionCookies};

// Re-export the route prefix and the core types embedders need
pub use account_session::{
    ACCOUNT_ROUTE_PREFIX, AccountService, AuthenticatedSession, CookieSettings,
    InMemoryAccountService, SameSite, SessionCodec, UserId,
};
