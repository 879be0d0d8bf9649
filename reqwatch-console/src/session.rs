//! Session state for the admin monitoring view
//!
//! One `MonitorView` is the single owner of everything a session holds: the
//! stored credential, the authentication state, the set of row ids observed
//! so far, and the highlight marks. All mutation goes through it, so a poll
//! tick's fetch result is applied atomically with respect to any other
//! reader of the sets.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use reqwatch_common::MeetingRequest;

use crate::detector::{detect, snapshot_ids};
use crate::fetch::FetchOutcome;
use crate::highlight::HighlightTracker;

/// Key the admin credential is stored under
const SECRET_KEY: &str = "admin_secret";

/// Volatile key-value store scoped to one session
///
/// Survives sign-out/sign-in cycles within the process; gone when the
/// process exits. Nothing here ever touches disk.
#[derive(Debug, Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Authentication state of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Before the stored credential (if any) has been checked
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated,
}

/// Result of resolving the stored credential at startup
#[derive(Debug)]
pub enum ResumeReport {
    /// No usable credential; the operator must sign in
    SignInRequired,
    /// Stored credential accepted; carries the initial record set
    Restored(Vec<MeetingRequest>),
}

/// Result of an explicit sign-in attempt
#[derive(Debug)]
pub enum LoginReport {
    /// Signed in; carries the initial record set
    SignedIn(Vec<MeetingRequest>),
    /// Probe fetch did not succeed with the supplied secret
    Rejected,
}

/// Result of applying one poll tick's fetch outcome
#[derive(Debug)]
pub enum TickReport {
    /// Snapshot applied; `new_count` ids were first seen this tick
    Updated {
        rows: Vec<MeetingRequest>,
        new_count: usize,
        should_notify: bool,
    },
    /// Transient failure; no state changed beyond the error surface
    Failed { message: String },
    /// Credential rejected mid-session; the view signed itself out
    AuthLost,
}

/// The single active view instance
#[derive(Debug, Default)]
pub struct MonitorView {
    store: SessionStore,
    state: SessionState,
    observed: HashSet<String>,
    highlights: HighlightTracker,
    initial_load_done: bool,
}

impl MonitorView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seed a credential before the startup probe (e.g. from the
    /// environment), leaving the state `Unknown` until it is checked.
    pub fn store_secret(&mut self, secret: String) {
        self.store.set(SECRET_KEY, secret);
    }

    pub fn secret(&self) -> Option<String> {
        self.store.get(SECRET_KEY).map(String::from)
    }

    pub fn highlights(&self) -> &HighlightTracker {
        &self.highlights
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Resolve the `Unknown` startup state
    ///
    /// `probe` is the result of fetching with the stored credential, or
    /// `None` when no credential is stored. Anything short of a successful
    /// snapshot discards the credential; the operator signs in manually.
    pub fn resume(&mut self, probe: Option<FetchOutcome>) -> ResumeReport {
        match probe {
            Some(FetchOutcome::Snapshot(rows)) => {
                info!("Stored credential accepted");
                self.enter_authenticated();
                self.apply_snapshot(&rows);
                ResumeReport::Restored(rows)
            }
            Some(_) => {
                debug!("Stored credential not usable; sign-in required");
                self.store.remove(SECRET_KEY);
                self.state = SessionState::Unauthenticated;
                ResumeReport::SignInRequired
            }
            None => {
                self.state = SessionState::Unauthenticated;
                ResumeReport::SignInRequired
            }
        }
    }

    /// Apply an explicit sign-in attempt
    ///
    /// `probe` is the result of fetching with `secret`. Success stores the
    /// credential and seeds the observed set as a fresh initial load; the
    /// attempt is always initial, even right after an earlier session.
    pub fn login(&mut self, secret: &str, probe: FetchOutcome) -> LoginReport {
        match probe {
            FetchOutcome::Snapshot(rows) => {
                self.store.set(SECRET_KEY, secret.to_string());
                self.enter_authenticated();
                self.apply_snapshot(&rows);
                info!(row_count = rows.len(), "Signed in");
                LoginReport::SignedIn(rows)
            }
            FetchOutcome::AuthRejected | FetchOutcome::TransientFailure(_) => {
                LoginReport::Rejected
            }
        }
    }

    /// Explicit sign-out: clears the credential and both id sets
    pub fn logout(&mut self) {
        self.store.remove(SECRET_KEY);
        self.state = SessionState::Unauthenticated;
        self.observed.clear();
        self.highlights.clear();
        self.initial_load_done = false;
        info!("Signed out");
    }

    /// Apply one poll tick's fetch outcome
    ///
    /// A transient failure leaves every set untouched - a failed fetch must
    /// never read as "zero new records". A credential rejection signs the
    /// view out; the sets are left in memory and re-seeded on next sign-in.
    pub fn apply_tick(&mut self, outcome: FetchOutcome) -> TickReport {
        match outcome {
            FetchOutcome::Snapshot(rows) => {
                let (new_count, should_notify) = self.apply_snapshot(&rows);
                TickReport::Updated {
                    rows,
                    new_count,
                    should_notify,
                }
            }
            FetchOutcome::AuthRejected => {
                warn!("Credential rejected mid-session; signing out");
                self.store.remove(SECRET_KEY);
                self.state = SessionState::Unauthenticated;
                TickReport::AuthLost
            }
            FetchOutcome::TransientFailure(message) => {
                warn!(error = %message, "Fetch failed; keeping previous state");
                TickReport::Failed { message }
            }
        }
    }

    /// Enter `Authenticated` with fresh sets awaiting an initial load
    fn enter_authenticated(&mut self) {
        self.state = SessionState::Authenticated;
        self.observed.clear();
        self.highlights.clear();
        self.initial_load_done = false;
    }

    /// Fold one snapshot into the observed/highlight sets
    ///
    /// Returns the number of first-seen ids and whether to alert.
    fn apply_snapshot(&mut self, rows: &[MeetingRequest]) -> (usize, bool) {
        let current_ids = snapshot_ids(rows);
        let is_initial = !self.initial_load_done;
        let detection = detect(&current_ids, &self.observed, is_initial);

        if !is_initial {
            self.highlights.accumulate(&detection.delta);
        }
        self.observed = detection.observed;
        self.initial_load_done = true;

        (detection.delta.len(), detection.should_notify)
    }
}
