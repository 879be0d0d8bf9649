//! Authentication middleware for the admin read API
//!
//! Validates possession of the shared admin secret, carried as
//! `Authorization: Bearer <secret>` or `X-Admin-Secret`. The comparison is
//! against a single configured value; a server started without a secret
//! rejects every admin request.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;
use reqwatch_common::api::auth::{parse_admin_secret, ADMIN_SECRET_HEADER};

use crate::AppState;

/// Authentication middleware
///
/// Returns 401 Unauthorized when the secret is missing or wrong.
///
/// **Note:** This is applied to admin routes only. The submission and
/// health endpoints do NOT use this middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let headers = request.headers();
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let fallback = headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    let provided = parse_admin_secret(authorization, fallback);

    if state.admin_secret.is_empty() {
        warn!("Admin request rejected: no admin secret configured");
        return Err(AuthError::Unauthorized);
    }

    match provided {
        Some(secret) if secret == state.admin_secret => Ok(next.run(request).await),
        Some(_) => {
            warn!("Admin request rejected: wrong secret");
            Err(AuthError::Unauthorized)
        }
        None => Err(AuthError::Unauthorized),
    }
}

/// Authentication error for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Unauthorized",
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
