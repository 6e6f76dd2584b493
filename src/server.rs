// This project was developed with assistance from GitHub Copilot
// Server setup and configuration

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::endpoints::{
    auth_handler, auth_method_not_allowed, jwks_handler, jwks_method_not_allowed, AppState,
    ServiceState,
};
use crate::error::JwksError;
use crate::key_management::KeyRegistry;

/// Create the application router with all endpoints
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/.well-known/jwks.json", jwks_route())
        .route("/jwks", jwks_route()) // Alternative endpoint
        .route("/auth", post(auth_handler).fallback(auth_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// GET only. axum would answer HEAD with the GET handler, so HEAD is
/// routed to the 405 response explicitly.
fn jwks_route() -> MethodRouter<AppState> {
    get(jwks_handler)
        .head(jwks_method_not_allowed)
        .fallback(jwks_method_not_allowed)
}

/// Generate both signing keys from the clock's current time.
///
/// Fails if either key cannot be generated; nothing is served in that case.
pub fn build_state(config: &Config, clock: Arc<dyn Clock>) -> Result<AppState, JwksError> {
    let registry = KeyRegistry::new(clock.now())?;

    Ok(Arc::new(ServiceState {
        registry: Arc::new(registry),
        clock,
        token_subject: config.token_subject.clone(),
    }))
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // RSA keygen is CPU bound; keep it off the async workers.
    let state_config = config.clone();
    let app_state =
        tokio::task::spawn_blocking(move || build_state(&state_config, Arc::new(SystemClock)))
            .await??;

    let app = create_app(app_state);

    let listener = TcpListener::bind(config.bind_address).await?;
    let addr = listener.local_addr()?;
    tracing::info!("JWKS server listening on http://{}", addr);
    tracing::info!("  GET  /.well-known/jwks.json - JWKS endpoint");
    tracing::info!("  GET  /jwks                   - Alternative JWKS endpoint");
    tracing::info!("  POST /auth                   - Authentication endpoint");
    tracing::info!("  POST /auth?expired           - Auth with expired key");

    axum::serve(listener, app).await?;

    Ok(())
}
