//! End-to-end walks of the sign-in / poll / detect / alert cycle
//!
//! Drives the poll task with scripted fetch outcomes under paused tokio
//! time, so each 20-second tick fires instantly and deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use reqwatch_common::MeetingRequest;
use reqwatch_console::fetch::FetchOutcome;
use reqwatch_console::notify::NotificationSink;
use reqwatch_console::poll::{start_polling, TickEvent};
use reqwatch_console::session::{LoginReport, MonitorView, SessionState};

const PERIOD: Duration = Duration::from_secs(20);

/// Sink that counts notifications instead of playing audio
#[derive(Default)]
struct CountingSink {
    count: AtomicUsize,
}

impl NotificationSink for CountingSink {
    fn notify(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn row(id: &str) -> MeetingRequest {
    MeetingRequest {
        id: id.to_string(),
        preferred_email: format!("{}@example.com", id),
        preferred_phone: None,
        preferred_date: None,
        preferred_time: None,
        alternative_date: None,
        alternative_time: None,
        firm_name: None,
        created_at: "2026-08-01T10:00:00.000Z".to_string(),
    }
}

fn snapshot(ids: &[&str]) -> FetchOutcome {
    FetchOutcome::Snapshot(ids.iter().map(|id| row(id)).collect())
}

/// Fetch closure that pops scripted outcomes, then reports exhaustion as a
/// transient failure
fn scripted(
    outcomes: Vec<FetchOutcome>,
) -> impl Fn(String) -> std::pin::Pin<Box<dyn std::future::Future<Output = FetchOutcome> + Send>>
       + Send
       + 'static {
    let script = Arc::new(std::sync::Mutex::new(VecDeque::from(outcomes)));
    move |_secret| {
        let script = Arc::clone(&script);
        Box::pin(async move {
            script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| FetchOutcome::TransientFailure("script exhausted".into()))
        })
    }
}

/// Sign in a fresh view with an initial backlog
fn signed_in_view(initial: &[&str]) -> Arc<Mutex<MonitorView>> {
    let mut view = MonitorView::new();
    let report = view.login("secret", snapshot(initial));
    assert!(matches!(report, LoginReport::SignedIn(_)));
    Arc::new(Mutex::new(view))
}

#[tokio::test(start_paused = true)]
async fn test_new_row_is_highlighted_and_chimes_once() {
    let view = signed_in_view(&["a", "b"]);
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let poll = start_polling(
        PERIOD,
        Arc::clone(&view),
        scripted(vec![snapshot(&["a", "b", "c"]), snapshot(&["a", "b", "c"])]),
        sink.clone(),
        tx,
    );

    // Tick 1: c arrives
    match rx.recv().await.unwrap() {
        TickEvent::Updated {
            rows,
            highlight_ids,
            new_count,
        } => {
            assert_eq!(rows.len(), 3);
            assert_eq!(new_count, 1);
            assert!(highlight_ids.contains("c"));
            assert!(!highlight_ids.contains("a"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(sink.count.load(Ordering::SeqCst), 1);

    // Tick 2: unchanged snapshot stays quiet, highlight persists
    match rx.recv().await.unwrap() {
        TickEvent::Updated {
            highlight_ids,
            new_count,
            ..
        } => {
            assert_eq!(new_count, 0);
            assert!(highlight_ids.contains("c"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(sink.count.load(Ordering::SeqCst), 1);

    poll.stop();
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_is_isolated() {
    let view = signed_in_view(&["a", "b"]);
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let poll = start_polling(
        PERIOD,
        Arc::clone(&view),
        scripted(vec![
            FetchOutcome::TransientFailure("connection reset".into()),
            snapshot(&["a", "b"]),
        ]),
        sink.clone(),
        tx,
    );

    // Tick 1: failure surfaces but nothing else changes
    match rx.recv().await.unwrap() {
        TickEvent::FetchFailed { message } => assert!(message.contains("connection reset")),
        other => panic!("unexpected event: {:?}", other),
    }
    {
        let view = view.lock().await;
        assert_eq!(view.state(), SessionState::Authenticated);
        assert_eq!(view.observed_count(), 2);
        assert!(view.highlights().is_empty());
    }
    assert_eq!(sink.count.load(Ordering::SeqCst), 0);

    // Tick 2: the next tick proceeds normally and is quiet
    match rx.recv().await.unwrap() {
        TickEvent::Updated { new_count, .. } => assert_eq!(new_count, 0),
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(sink.count.load(Ordering::SeqCst), 0);

    poll.stop();
}

#[tokio::test(start_paused = true)]
async fn test_auth_rejection_stops_polling_and_signs_out() {
    let view = signed_in_view(&["a"]);
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _poll = start_polling(
        PERIOD,
        Arc::clone(&view),
        scripted(vec![FetchOutcome::AuthRejected]),
        sink.clone(),
        tx,
    );

    assert!(matches!(rx.recv().await, Some(TickEvent::AuthLost)));

    // The task ended on its own: the channel closes without another event
    assert!(rx.recv().await.is_none());

    let view = view.lock().await;
    assert_eq!(view.state(), SessionState::Unauthenticated);
    assert_eq!(view.secret(), None);
    assert_eq!(sink.count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_in_flight_fetch() {
    let view = signed_in_view(&["a"]);
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    // A fetch that never finishes within the test window
    let slow_fetch = |_secret: String| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        snapshot(&["a", "x"])
    };

    let poll = start_polling(PERIOD, Arc::clone(&view), slow_fetch, sink.clone(), tx);

    // Let the first tick fire and the fetch get in flight, then stop
    tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;
    poll.stop();

    // The aborted fetch's result is never applied
    assert!(rx.recv().await.is_none());
    let view = view.lock().await;
    assert_eq!(view.observed_count(), 1);
    assert_eq!(sink.count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_then_fresh_login_matches_clean_start() {
    let view = signed_in_view(&["a", "b"]);

    // Accumulate a highlight, then sign out
    {
        let mut v = view.lock().await;
        v.apply_tick(snapshot(&["a", "b", "c"]));
        assert_eq!(v.highlights().len(), 1);
        v.logout();
        assert_eq!(v.state(), SessionState::Unauthenticated);
    }

    // Fresh login over the same backlog looks exactly like a first load
    {
        let mut v = view.lock().await;
        let report = v.login("secret", snapshot(&["a", "b", "c"]));
        assert!(matches!(report, LoginReport::SignedIn(_)));
        assert_eq!(v.observed_count(), 3);
        assert!(v.highlights().is_empty());
    }

    // And polling from there only alerts on genuinely new rows
    let sink = Arc::new(CountingSink::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poll = start_polling(
        PERIOD,
        Arc::clone(&view),
        scripted(vec![snapshot(&["a", "b", "c", "d"])]),
        sink.clone(),
        tx,
    );

    match rx.recv().await.unwrap() {
        TickEvent::Updated {
            highlight_ids,
            new_count,
            ..
        } => {
            assert_eq!(new_count, 1);
            assert_eq!(highlight_ids.len(), 1);
            assert!(highlight_ids.contains("d"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(sink.count.load(Ordering::SeqCst), 1);

    poll.stop();
}
