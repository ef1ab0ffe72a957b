use std::sync::Arc;

use axum::{Router, routing::get};

use account_session_axum::{
    ACCOUNT_ROUTE_PREFIX, AccountService, AccountState, InMemoryAccountService, account_router,
};

mod protected;
mod server;

use crate::server::{init_tracing, spawn_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_accounts");

    let service: Arc<dyn AccountService> = Arc::new(InMemoryAccountService::new());
    let state = AccountState::new(service.clone());

    let app = Router::new()
        .route("/", get(index))
        .merge(protected::router(state))
        .nest(ACCOUNT_ROUTE_PREFIX.as_str(), account_router(service));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    spawn_http_server(port, app).await??;
    Ok(())
}

async fn index() -> String {
    format!(
        "Account demo. Register with POST {prefix}/register, then visit /protected.",
        prefix = ACCOUNT_ROUTE_PREFIX.as_str()
    )
}
