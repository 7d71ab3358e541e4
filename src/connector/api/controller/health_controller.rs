use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::connector::api::Container;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_configured: bool,
}

/// `GET /health`
pub async fn health(State(container): State<Arc<Container>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_configured: container.is_model_configured(),
    })
}
