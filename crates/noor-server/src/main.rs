use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use noor_api::auth::AppStateInner;
use noor_completion::{CompletionClient, CompletionConfig};

const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noor=debug,noor_api=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("NOOR_JWT_SECRET").unwrap_or_else(|_| PLACEHOLDER_SECRET.into());
    if jwt_secret == PLACEHOLDER_SECRET {
        warn!("NOOR_JWT_SECRET is unset, using the development placeholder");
    }
    let db_path = std::env::var("NOOR_DB_PATH").unwrap_or_else(|_| "noor.db".into());
    let host = std::env::var("NOOR_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("NOOR_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("OPENROUTER_API_KEY is unset, dua requests will fail");
    }
    let mut completion = CompletionConfig::new(api_key);
    if let Ok(endpoint) = std::env::var("NOOR_COMPLETION_URL") {
        completion.endpoint = endpoint;
    }
    if let Ok(model) = std::env::var("NOOR_COMPLETION_MODEL") {
        completion.model = model;
    }
    if let Ok(site_url) = std::env::var("NOOR_SITE_URL") {
        completion.site_url = site_url;
    }
    if let Ok(title) = std::env::var("NOOR_APP_TITLE") {
        completion.app_title = title;
    }
    let completion = CompletionClient::new(completion)?;
    info!("Completion model: {}", completion.model());

    // Init database
    let db = noor_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state = Arc::new(AppStateInner {
        db,
        jwt_secret,
        completion,
    });

    let app = noor_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("NoorAI server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
