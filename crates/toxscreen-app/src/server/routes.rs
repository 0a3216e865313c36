use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use toxscreen_core::Prediction;

use crate::server::state::PredictService;

// ============================================================================
// UI
// ============================================================================

pub async fn index() -> impl IntoResponse {
    Html(include_str!("../../assets/index.html"))
}

// ============================================================================
// Health and configuration
// ============================================================================

pub async fn health(State(state): State<Arc<PredictService>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "trees": state.model().n_trees(),
        "trained_at": state.config().trained_at,
    }))
}

pub async fn get_config(State(state): State<Arc<PredictService>>) -> impl IntoResponse {
    Json(state.config().clone())
}

// ============================================================================
// Prediction
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub smiles: String,
    /// Per-request override of the stored decision threshold.
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub smiles: String,
    #[serde(flatten)]
    pub prediction: Prediction,
    /// SVG depiction of the parsed structure; absent when unrecognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depiction: Option<String>,
}

pub async fn predict(
    State(state): State<Arc<PredictService>>,
    Json(req): Json<PredictRequest>,
) -> impl IntoResponse {
    if let Some(t) = req.threshold {
        if !(0.0..=1.0).contains(&t) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": format!("threshold {t} not in [0, 1]") })),
            )
                .into_response();
        }
    }

    match state.predict(&req.smiles, req.threshold) {
        Ok(scored) => Json(PredictResponse {
            smiles: req.smiles,
            prediction: scored.prediction,
            depiction: scored.depiction,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
