//! New-row detection over successive snapshot fetches
//!
//! Pure set arithmetic, no I/O. Each successful fetch produces the current
//! id set; the delta against the ids observed earlier in the session is what
//! gets highlighted and chimed. The first load after authentication is
//! suppressed - every row is "new" against an empty observed set, and
//! chiming for the whole backlog on sign-in would make the alert worthless.

use std::collections::HashSet;

use reqwatch_common::MeetingRequest;

/// Result of diffing one snapshot against the session's observed ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Observed set after this snapshot (previous set union current ids)
    pub observed: HashSet<String>,
    /// Ids present now that were never seen before this tick
    pub delta: HashSet<String>,
    /// Whether this delta warrants an audible alert
    pub should_notify: bool,
}

/// Collect the id set of a fetched record list
pub fn snapshot_ids(rows: &[MeetingRequest]) -> HashSet<String> {
    rows.iter().map(|r| r.id.clone()).collect()
}

/// Diff `current_ids` against `observed` and fold them together
///
/// `is_initial` marks the first load after authentication; it suppresses
/// the notification but not the delta itself.
pub fn detect(
    current_ids: &HashSet<String>,
    observed: &HashSet<String>,
    is_initial: bool,
) -> Detection {
    let delta: HashSet<String> = current_ids.difference(observed).cloned().collect();
    let new_observed: HashSet<String> = observed.union(current_ids).cloned().collect();
    let should_notify = !is_initial && !delta.is_empty();

    Detection {
        observed: new_observed,
        delta,
        should_notify,
    }
}
