//! Owned poll task driving fetch → detect → apply on a fixed period
//!
//! Exactly one poll task runs per authenticated session: started on entering
//! the authenticated state, stopped on leaving it. Ticks are strictly
//! sequential - the next tick cannot begin until the previous fetch and its
//! state application completed, and ticks missed while a fetch was slow are
//! skipped rather than queued. Stopping the task cancels the pending timer
//! and discards any fetch still in flight.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use reqwatch_common::MeetingRequest;

use crate::fetch::FetchOutcome;
use crate::notify::NotificationSink;
use crate::session::{MonitorView, TickReport};

/// What one tick produced, for the rendering layer
#[derive(Debug)]
pub enum TickEvent {
    /// Fresh snapshot applied; `highlight_ids` is the cumulative set
    Updated {
        rows: Vec<MeetingRequest>,
        highlight_ids: HashSet<String>,
        new_count: usize,
    },
    /// Transient failure; shown as a banner, retried next tick
    FetchFailed { message: String },
    /// Credential rejected; the task has stopped itself
    AuthLost,
}

/// Handle owning a running poll task
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling: cancels the pending timer and discards any fetch in
    /// flight rather than applying its result
    pub fn stop(self) {
        self.handle.abort();
    }
}

/// Start the poll task for an authenticated view
///
/// `fetch` is called with the stored secret each tick. Events are delivered
/// on `events`; the task ends on its own when the credential is rejected or
/// disappears.
pub fn start_polling<F, Fut>(
    period: Duration,
    view: Arc<Mutex<MonitorView>>,
    fetch: F,
    sink: Arc<dyn NotificationSink>,
    events: mpsc::UnboundedSender<TickEvent>,
) -> PollHandle
where
    F: Fn(String) -> Fut + Send + 'static,
    Fut: Future<Output = FetchOutcome> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // An interval's first tick completes immediately; the initial load
        // already happened at sign-in, so consume it.
        interval.tick().await;

        info!("Poll task started ({}s interval)", period.as_secs());

        loop {
            interval.tick().await;

            let secret = { view.lock().await.secret() };
            let Some(secret) = secret else {
                debug!("No credential stored; poll task ending");
                break;
            };

            let outcome = fetch(secret).await;

            // Apply and read out the cumulative highlights in one critical
            // section, so a render never mixes two ticks' state
            let (report, highlight_ids) = {
                let mut view = view.lock().await;
                let report = view.apply_tick(outcome);
                (report, view.highlights().ids().clone())
            };

            match report {
                TickReport::Updated {
                    rows,
                    new_count,
                    should_notify,
                } => {
                    if should_notify {
                        info!(new_count, "New meeting requests arrived");
                        sink.notify();
                    }
                    let _ = events.send(TickEvent::Updated {
                        rows,
                        highlight_ids,
                        new_count,
                    });
                }
                TickReport::Failed { message } => {
                    let _ = events.send(TickEvent::FetchFailed { message });
                }
                TickReport::AuthLost => {
                    warn!("Poll task stopping: session no longer authenticated");
                    let _ = events.send(TickEvent::AuthLost);
                    break;
                }
            }
        }
    });

    PollHandle { handle }
}
