//! Meeting-request record model and submission validation
//!
//! The record shape matches the `meeting_requests` table column-for-column.
//! Timestamps are stored and transported as RFC 3339 strings; consumers that
//! need calendar arithmetic parse them at the edge.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One stored meeting request, as returned by the admin read API
///
/// Rows are ordered newest-first by the read query; the `id` is the stable
/// identity used by the monitoring console to recognize rows across fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MeetingRequest {
    /// Record UUID, assigned at insert time
    pub id: String,
    /// Contact email (required, validated on submission)
    pub preferred_email: String,
    pub preferred_phone: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub alternative_date: Option<String>,
    pub alternative_time: Option<String>,
    pub firm_name: Option<String>,
    /// Insert timestamp, RFC 3339 UTC
    pub created_at: String,
}

/// Incoming submission body for `POST /api/meeting-request`
///
/// Field names are camelCase on the wire. Everything is optional at the
/// deserialization layer; [`MeetingRequestSubmission::validate`] enforces the
/// actual requirements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequestSubmission {
    pub preferred_email: Option<String>,
    pub preferred_phone: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub alternative_date: Option<String>,
    pub alternative_time: Option<String>,
    pub firm_name: Option<String>,
}

/// A submission that passed validation, ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub preferred_email: String,
    pub preferred_phone: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub alternative_date: Option<String>,
    pub alternative_time: Option<String>,
    pub firm_name: Option<String>,
}

impl MeetingRequestSubmission {
    /// Validate and normalize a submission
    ///
    /// Requires a well-formed `preferredEmail`; all other fields are trimmed
    /// and dropped entirely when empty.
    pub fn validate(self) -> Result<ValidatedSubmission> {
        let email = self
            .preferred_email
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();

        if email.is_empty() {
            return Err(Error::InvalidInput("preferredEmail is required".into()));
        }
        if !is_valid_email(email) {
            return Err(Error::InvalidInput(
                "preferredEmail must be a valid email address".into(),
            ));
        }

        Ok(ValidatedSubmission {
            preferred_email: email.to_string(),
            preferred_phone: normalize(self.preferred_phone),
            preferred_date: normalize(self.preferred_date),
            preferred_time: normalize(self.preferred_time),
            alternative_date: normalize(self.alternative_date),
            alternative_time: normalize(self.alternative_time),
            firm_name: normalize(self.firm_name),
        })
    }
}

/// Trim an optional field, mapping whitespace-only values to `None`
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Email shape check: `local@domain`, no whitespace, and the domain must
/// contain a dot with text on both sides
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}
