//! HTTP surface: `POST /predict` plus a health probe. Every per-request
//! error is converted to a structured `{"error": ...}` response at this
//! boundary; nothing escapes to terminate the process.

use std::fmt;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use featurize::{AttributeBag, PipelineError};
use inference::{invoke, ModelError};

use crate::state::ServerState;

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_calculated: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_id: String,
    pub model_version: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    EmptyBody,
    Pipeline(PipelineError),
    Model(ModelError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "invalid input: no data provided"),
            Self::Pipeline(err) => write!(f, "{}", err),
            Self::Model(err) => write!(f, "inference failed: {}", err),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyBody => None,
            Self::Pipeline(err) => Some(err),
            Self::Model(err) => Some(err),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<ModelError> for ApiError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl ApiError {
    /// Request faults are 400s; configuration and internal faults are
    /// 500s, so a bad request is never mistaken for a bad deployment.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyBody => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::UnseenCategory { .. }) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::SchemaUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed with internal error");
        } else {
            warn!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody {
            error: self.to_string(),
        }))
            .into_response()
    }
}

async fn handle_predict(
    State(state): State<Arc<ServerState>>,
    body: Option<Json<Value>>,
) -> Response {
    let Some(Json(value)) = body else {
        return ApiError::EmptyBody.into_response();
    };
    match predict(&state, value) {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Per-request orchestration: bag → pipeline → model → response payload.
pub(crate) fn predict(state: &ServerState, value: Value) -> Result<PredictResponse, ApiError> {
    let bag = AttributeBag::from_value(value).ok_or(ApiError::EmptyBody)?;
    if bag.is_empty() {
        return Err(ApiError::EmptyBody);
    }

    let vector = state.pipeline().vectorize(&bag)?;
    let columns = state.pipeline().schema().names();
    let result = invoke(state.model(), &columns, &vector)?;

    Ok(PredictResponse {
        prediction: result.label,
        message: label_message(result.label).to_string(),
        probability: result.probabilities,
        overall_calculated: result.auxiliary_score,
    })
}

fn label_message(label: i64) -> &'static str {
    match label {
        1 => "High-potential player profile.",
        0 => "Standard player profile.",
        _ => "Unrecognized label.",
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_id: state.model_id().to_string(),
        model_version: state.model_version().to_string(),
    })
}

#[cfg(test)]
mod tests;
