//! Queries for the meeting_requests table

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use reqwatch_common::model::{MeetingRequest, ValidatedSubmission};

/// Insert one validated submission, assigning id and creation timestamp
pub async fn insert_request(
    pool: &SqlitePool,
    submission: ValidatedSubmission,
) -> Result<MeetingRequest> {
    let row = MeetingRequest {
        id: Uuid::new_v4().to_string(),
        preferred_email: submission.preferred_email,
        preferred_phone: submission.preferred_phone,
        preferred_date: submission.preferred_date,
        preferred_time: submission.preferred_time,
        alternative_date: submission.alternative_date,
        alternative_time: submission.alternative_time,
        firm_name: submission.firm_name,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    sqlx::query(
        "INSERT INTO meeting_requests (
            id, preferred_email, preferred_phone, preferred_date, preferred_time,
            alternative_date, alternative_time, firm_name, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.preferred_email)
    .bind(&row.preferred_phone)
    .bind(&row.preferred_date)
    .bind(&row.preferred_time)
    .bind(&row.alternative_date)
    .bind(&row.alternative_time)
    .bind(&row.firm_name)
    .bind(&row.created_at)
    .execute(pool)
    .await?;

    Ok(row)
}

/// List all meeting requests, newest first
///
/// The secondary id ordering keeps rows inserted within the same millisecond
/// in a stable display order.
pub async fn list_requests(pool: &SqlitePool) -> Result<Vec<MeetingRequest>> {
    let rows = sqlx::query_as::<_, MeetingRequest>(
        "SELECT id, preferred_email, preferred_phone, preferred_date, preferred_time,
                alternative_date, alternative_time, firm_name, created_at
         FROM meeting_requests
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
