use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let static_dir = state.server.static_dir.clone();
    let generation_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handlers::handle_overload))
        .load_shed()
        .concurrency_limit(state.server.max_concurrent_generations);

    Router::new()
        .route(
            "/generate_content",
            post(handlers::generate_content).layer(generation_limit),
        )
        .route("/history", get(handlers::history))
        .route("/api/history", get(handlers::api_history))
        .route("/api/analytics", get(handlers::analytics))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve `app` until ctrl-c.
pub async fn serve(app: Router, listener: tokio::net::TcpListener) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await
}

pub mod prelude {
    pub use crate::{create_app, serve, ApiError, AppState};
    pub use ag_core::{Error, Result};
}
