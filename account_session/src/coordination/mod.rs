//! Handler core functions
//!
//! One function per account endpoint. Each composes the Session Codec or
//! Session Guard with a single Account Service call and returns the response
//! body, plus the `Set-Cookie` headers for register, login and logout.
//! Transport headers are only produced after the Account Service succeeded.

mod account;
mod errors;

pub use account::{
    check_token_core, exists_core, get_profile_core, login_core, logout_core, register_core,
    update_email_core, upsert_profile_core,
};
pub use errors::CoordinationError;
