//! Alert Mute-State Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;

use alerting::Error;

use crate::AppState;

/// JSON payload returned for failed mutations
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Maps manager failures onto HTTP statuses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_unauthorized() {
            StatusCode::FORBIDDEN
        } else if self.0.is_conflict() {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = ErrorBody {
            error: self.0.code(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn record_outcome(operation: &'static str, result: &Result<(), Error>) {
    let outcome = match result {
        Ok(()) => "ok",
        Err(err) => err.code(),
    };
    counter!(
        "alert_mute_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Mute all notifications for an alert
pub async fn mute_all(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let result = state.manager.mute_all(&id).await;
    record_outcome("mute_all", &result);
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unmute all notifications for an alert
pub async fn unmute_all(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let result = state.manager.unmute_all(&id).await;
    record_outcome("unmute_all", &result);
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mute a single alert instance
pub async fn mute_instance(
    State(state): State<Arc<AppState>>,
    Path((id, instance_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let result = state.manager.mute_instance(&id, &instance_id).await;
    record_outcome("mute_instance", &result);
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unmute a single alert instance
pub async fn unmute_instance(
    State(state): State<Arc<AppState>>,
    Path((id, instance_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let result = state.manager.unmute_instance(&id, &instance_id).await;
    record_outcome("unmute_instance", &result);
    result?;
    Ok(StatusCode::NO_CONTENT)
}
