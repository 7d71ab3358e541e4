use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::container::Container;
use super::controller::{health, recommend};

pub const RECOMMENDATION_PATH: &str = "/api/recommendation";
pub const HEALTH_PATH: &str = "/health";

pub fn build_router(container: Arc<Container>) -> Router {
    // The mobile front end calls from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route(RECOMMENDATION_PATH, post(recommend))
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(container)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, container: Arc<Container>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Backend server listening at http://{}", addr);
    info!("API endpoint: http://{}{}", addr, RECOMMENDATION_PATH);

    axum::serve(listener, build_router(container))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
