//! Authenticated snapshot fetch against the admin read API
//!
//! One fetch returns the full current record set. The outcome is classified
//! for the session machine: a parsed snapshot, a credential rejection, or a
//! transient failure that the next tick will retry. Fetching has no side
//! effects and is safe to repeat.

use std::time::Duration;

use reqwatch_common::api::auth::bearer;
use reqwatch_common::{Error, MeetingRequest, Result};

const USER_AGENT: &str = "reqwatch-console/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Outcome of one snapshot fetch
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Full record set, newest first as ordered by the server
    Snapshot(Vec<MeetingRequest>),
    /// The server rejected the credential (HTTP 401/403)
    AuthRejected,
    /// Network error, server error, or unparseable body; retried next tick
    TransientFailure(String),
}

/// HTTP client for the admin read endpoint
pub struct HttpFetcher {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/api/admin/meeting-requests",
            base_url.trim_end_matches('/')
        );

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Fetch the current record set with the given admin secret
    pub async fn fetch(&self, secret: &str) -> FetchOutcome {
        tracing::debug!(endpoint = %self.endpoint, "Fetching meeting requests");

        let response = match self
            .http_client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, bearer(secret))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::TransientFailure(format!("Request failed: {}", e));
            }
        };

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!(status_code = status.as_u16(), "Admin secret rejected");
            return FetchOutcome::AuthRejected;
        }

        if !status.is_success() {
            return FetchOutcome::TransientFailure(format!(
                "Server returned HTTP {}",
                status.as_u16()
            ));
        }

        match response.json::<Vec<MeetingRequest>>().await {
            Ok(rows) => {
                tracing::debug!(row_count = rows.len(), "Snapshot fetched");
                FetchOutcome::Snapshot(rows)
            }
            Err(e) => FetchOutcome::TransientFailure(format!("Malformed response: {}", e)),
        }
    }
}
