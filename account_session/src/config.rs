//! Central configuration for the account_session crate

use std::sync::LazyLock;

/// Route prefix for all account endpoints
///
/// This is the prefix under which the account router is expected to be mounted.
/// Default: "/account"
pub static ACCOUNT_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    route_prefix_from(std::env::var("ACCOUNT_ROUTE_PREFIX").ok())
});

const DEFAULT_ROUTE_PREFIX: &str = "/account";

/// Normalize to `/segment[/segment..]`, the only form a router can nest under
///
/// A missing leading slash is added and trailing slashes are dropped. Values
/// that leave nothing to nest under, such as `/`, fall back to the default.
fn route_prefix_from(value: Option<String>) -> String {
    let Some(raw) = value else {
        return DEFAULT_ROUTE_PREFIX.to_string();
    };
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        if !raw.is_empty() {
            tracing::warn!(
                "ACCOUNT_ROUTE_PREFIX {:?} cannot be nested, using {}",
                raw,
                DEFAULT_ROUTE_PREFIX
            );
        }
        return DEFAULT_ROUTE_PREFIX.to_string();
    }
    format!("/{trimmed}")
}
