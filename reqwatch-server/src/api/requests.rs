//! Admin read API for meeting requests

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use reqwatch_common::MeetingRequest;

use crate::{db, AppState};

/// GET /api/admin/meeting-requests
///
/// Returns the full record set ordered newest-first. Protected by the
/// admin-secret middleware.
pub async fn list_meeting_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeetingRequest>>, ListError> {
    let rows = db::requests::list_requests(&state.db).await.map_err(|e| {
        error!("Failed to load meeting requests: {}", e);
        ListError::Database
    })?;

    Ok(Json(rows))
}

/// Read-side error for HTTP responses
#[derive(Debug)]
pub enum ListError {
    Database,
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Failed to load meeting requests",
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
