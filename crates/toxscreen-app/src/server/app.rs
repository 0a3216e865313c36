use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::server::{routes, state::PredictService};

/// Build the Axum application around a loaded model.
pub fn build_app(service: Arc<PredictService>) -> Router {
    // Local screening tool; the API carries no credentials
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/config", get(routes::get_config))
        .route("/predict", post(routes::predict));

    Router::new()
        .route("/", get(routes::index))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(service)
}

/// Run the server until interrupted.
pub async fn run_server(service: Arc<PredictService>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_app(service);

    tracing::info!("Starting toxscreen server on {}", addr);
    tracing::info!("Open http://{} in your browser", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
