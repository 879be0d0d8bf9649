//! Public submission endpoint for meeting requests

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info};
use reqwatch_common::model::MeetingRequestSubmission;
use reqwatch_common::Error;

use crate::{db, AppState};

/// POST /api/meeting-request
///
/// Validates and persists one submission. The record id and creation
/// timestamp are assigned server-side at insert time.
pub async fn submit_meeting_request(
    State(state): State<AppState>,
    body: Result<Json<MeetingRequestSubmission>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<serde_json::Value>, SubmitError> {
    let Json(submission) = body.map_err(|_| {
        SubmitError::InvalidBody("Invalid JSON in request body".to_string())
    })?;

    let validated = submission.validate().map_err(|e| match e {
        Error::InvalidInput(msg) => SubmitError::InvalidBody(msg),
        other => SubmitError::Internal(other.to_string()),
    })?;

    let row = db::requests::insert_request(&state.db, validated)
        .await
        .map_err(|e| {
            error!("Failed to save meeting request: {}", e);
            SubmitError::Internal("We couldn't save your request".to_string())
        })?;

    info!(id = %row.id, "Meeting request saved");

    Ok(Json(json!({ "success": true })))
}

/// Submission error for HTTP responses
#[derive(Debug)]
pub enum SubmitError {
    InvalidBody(String),
    Internal(String),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SubmitError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, msg),
            SubmitError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));
        (status, body).into_response()
    }
}
