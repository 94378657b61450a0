//! HTTP surface: two endpoints over the pricing service.
//!
//! Each request runs the full blocking pipeline (file read, indicator
//! computation, scaler fit, model load, inference) on the blocking pool.
//! Errors never escape a handler: expected failures surface their message,
//! anything unexpected is logged and collapsed to a generic string, both as
//! a 500 with an `{error}` body.

use crate::application::service::PricingService;
use crate::config::Config;
use crate::domain::errors::PredictError;
use crate::domain::types::{PredictRequest, PredictResponse, PriceHistoryResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub fn router(config: Config) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/price-history", get(price_history))
        .with_state(Arc::new(config))
}

async fn predict(
    State(config): State<Arc<Config>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let response = tokio::task::spawn_blocking(move || {
        PricingService::new((*config).clone()).predict(&request)
    })
    .await
    .map_err(|e| PredictError::Internal(e.into()))??;

    Ok(Json(response))
}

async fn price_history(
    State(config): State<Arc<Config>>,
) -> Result<Json<PriceHistoryResponse>, ApiError> {
    let response =
        tokio::task::spawn_blocking(move || PricingService::new((*config).clone()).price_history())
            .await
            .map_err(|e| PredictError::Internal(e.into()))??;

    Ok(Json(response))
}

struct ApiError(PredictError);

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            PredictError::MissingModel { .. }
            | PredictError::MissingData { .. }
            | PredictError::InsufficientData { .. } => self.0.to_string(),
            PredictError::DataRead(e) => {
                error!("data file read failed: {e}");
                "failed to read data file".to_string()
            }
            PredictError::Internal(e) => {
                error!("unexpected prediction failure: {e:#}");
                "internal server error".to_string()
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
