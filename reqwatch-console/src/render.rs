//! Plain-text rendering of the request table
//!
//! Presentation only. Rows arrive newest-first from the server and are
//! printed in that order; highlighted rows get a `*` marker in the first
//! column.

use std::collections::HashSet;

use chrono::DateTime;
use reqwatch_common::MeetingRequest;

const MISSING: &str = "—";

/// Render the full table, one row per record
pub fn render_rows(rows: &[MeetingRequest], highlight_ids: &HashSet<String>) -> String {
    if rows.is_empty() {
        return "No meeting requests yet.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "  {:<30} {:<14} {:<22} {:<22} {:<18} {}\n",
        "EMAIL", "PHONE", "PREFERRED", "ALTERNATIVE", "NAME", "SUBMITTED"
    ));

    for row in rows {
        let marker = if highlight_ids.contains(&row.id) { '*' } else { ' ' };
        out.push_str(&format!(
            "{} {:<30} {:<14} {:<22} {:<22} {:<18} {}\n",
            marker,
            row.preferred_email,
            row.preferred_phone.as_deref().unwrap_or(MISSING),
            date_time_pair(&row.preferred_date, &row.preferred_time),
            date_time_pair(&row.alternative_date, &row.alternative_time),
            row.firm_name.as_deref().unwrap_or(MISSING),
            format_timestamp(&row.created_at),
        ));
    }

    out
}

/// Totals line shown under the table
pub fn summary_line(total: usize, new_since_open: usize) -> String {
    let plural = if total != 1 { "s" } else { "" };
    let mut line = format!("{} request{} total", total, plural);
    if new_since_open > 0 {
        line.push_str(&format!(
            " · {} new since you opened this view",
            new_since_open
        ));
    }
    line
}

/// Join a date and time as "date at time", falling back per part
fn date_time_pair(date: &Option<String>, time: &Option<String>) -> String {
    match (date.as_deref(), time.as_deref()) {
        (Some(d), Some(t)) => format!("{} at {}", d, t),
        (Some(d), None) => d.to_string(),
        (None, Some(t)) => t.to_string(),
        (None, None) => MISSING.to_string(),
    }
}

/// Compact display form of an RFC 3339 timestamp
pub fn format_timestamp(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}
