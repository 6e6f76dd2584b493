// This project was developed with assistance from GitHub Copilot
// Educational JWKS server implementation
//
// Serves a JSON Web Key Set containing only unexpired public keys and issues
// RS256 tokens signed either by the active key or, for negative testing, by a
// key that expired before the server started.

use jwks::{config::Config, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwks=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::start_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
