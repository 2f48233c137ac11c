use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

mod ai;
mod routes;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_BIND: &str = "0.0.0.0:3001";

#[derive(Clone)]
pub struct AppState {
    pub ai_api_key: Option<String>,
    pub model: String,
    pub http: reqwest::Client,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/chat", post(routes::chat))
        .route("/api/export", post(routes::export))
        .route("/api/share/encode", post(routes::share_encode))
        .route("/api/share/decode", post(routes::share_decode))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,designer=info".into()),
        )
        .init();

    let state = AppState {
        ai_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
        model: std::env::var("DESIGNER_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        http: reqwest::Client::new(),
    };
    if state.ai_api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set, /api/chat will fail");
    }

    let bind = std::env::var("DESIGNER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Cannot bind {}: {}", bind, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{}", bind);
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
