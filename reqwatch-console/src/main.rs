//! reqwatch-console - Polling admin monitor for meeting requests
//!
//! Signs in against the reqwatch server with the shared admin secret, then
//! polls the admin read API on a fixed interval. Rows that arrive while the
//! console is open are highlighted in the table and announced with a short
//! chime. `logout` signs out, `quit` (or Ctrl-C / EOF) exits.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use reqwatch_console::fetch::HttpFetcher;
use reqwatch_console::notify::{ChimePlayer, NotificationSink, SilentSink};
use reqwatch_console::poll::{start_polling, PollHandle, TickEvent};
use reqwatch_console::render::{render_rows, summary_line};
use reqwatch_console::session::{LoginReport, MonitorView, ResumeReport, SessionState};

/// Command-line arguments for reqwatch-console
#[derive(Parser, Debug)]
#[command(name = "reqwatch-console")]
#[command(about = "Admin monitor for incoming meeting requests")]
#[command(version)]
struct Args {
    /// Base URL of the reqwatch server
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:5780",
        env = "REQWATCH_SERVER_URL"
    )]
    server_url: String,

    /// Poll interval in seconds
    #[arg(long, default_value = "20", env = "REQWATCH_POLL_INTERVAL_SECS")]
    interval: u64,

    /// Admin secret, checked at startup as a pre-stored credential
    #[arg(long, env = "REQWATCH_ADMIN_SECRET")]
    admin_secret: Option<String>,

    /// Disable the audible new-request chime
    #[arg(long)]
    mute: bool,
}

/// Why the authenticated phase ended
enum ExitReason {
    Quit,
    SignedOut,
    AuthLost,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the table
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting reqwatch-console v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let fetcher =
        Arc::new(HttpFetcher::new(&args.server_url).context("Failed to create HTTP client")?);
    let sink: Arc<dyn NotificationSink> = if args.mute {
        Arc::new(SilentSink)
    } else {
        Arc::new(ChimePlayer)
    };
    let period = Duration::from_secs(args.interval.max(1));

    let view = Arc::new(Mutex::new(MonitorView::new()));
    if let Some(secret) = args.admin_secret {
        view.lock().await.store_secret(secret);
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("reqwatch console — {}", args.server_url);
    println!("Auto-refresh every {}s. Commands: logout, quit", period.as_secs());

    loop {
        let state = { view.lock().await.state() };
        match state {
            SessionState::Unknown => {
                let secret = { view.lock().await.secret() };
                let probe = match &secret {
                    Some(secret) => Some(fetcher.fetch(secret).await),
                    None => None,
                };
                let report = { view.lock().await.resume(probe) };
                if let ResumeReport::Restored(rows) = report {
                    print_table(&rows, &view).await;
                }
            }
            SessionState::Unauthenticated => {
                let Some(secret) = prompt_secret(&mut stdin).await? else {
                    return Ok(());
                };
                if secret.is_empty() {
                    println!("Please enter the admin secret.");
                    continue;
                }
                let probe = fetcher.fetch(&secret).await;
                let report = { view.lock().await.login(&secret, probe) };
                match report {
                    LoginReport::SignedIn(rows) => {
                        print_table(&rows, &view).await;
                    }
                    LoginReport::Rejected => {
                        println!("Invalid admin secret.");
                    }
                }
            }
            SessionState::Authenticated => {
                match watch(period, &view, &fetcher, &sink, &mut stdin).await? {
                    ExitReason::Quit => return Ok(()),
                    ExitReason::SignedOut => println!("Signed out."),
                    ExitReason::AuthLost => {
                        println!("Session rejected by the server. Sign in again.");
                    }
                }
            }
        }
    }
}

/// Run the poll loop until sign-out, auth loss, or quit
async fn watch(
    period: Duration,
    view: &Arc<Mutex<MonitorView>>,
    fetcher: &Arc<HttpFetcher>,
    sink: &Arc<dyn NotificationSink>,
    stdin: &mut Lines<BufReader<Stdin>>,
) -> Result<ExitReason> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let fetch_client = Arc::clone(fetcher);
    let poll: PollHandle = start_polling(
        period,
        Arc::clone(view),
        move |secret| {
            let client = Arc::clone(&fetch_client);
            async move { client.fetch(&secret).await }
        },
        Arc::clone(sink),
        events_tx,
    );

    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(TickEvent::Updated { rows, highlight_ids, new_count }) => {
                    if new_count > 0 {
                        println!();
                    }
                    print!("{}", render_rows(&rows, &highlight_ids));
                    println!("{}", summary_line(rows.len(), highlight_ids.len()));
                }
                Some(TickEvent::FetchFailed { message }) => {
                    println!("⚠ {} (keeping last data, will retry)", message);
                }
                Some(TickEvent::AuthLost) | None => {
                    poll.stop();
                    return Ok(ExitReason::AuthLost);
                }
            },
            line = stdin.next_line() => {
                let line = line.context("Failed to read stdin")?;
                match line.as_deref().map(str::trim) {
                    Some("logout") => {
                        poll.stop();
                        view.lock().await.logout();
                        return Ok(ExitReason::SignedOut);
                    }
                    Some("quit") | Some("exit") | None => {
                        poll.stop();
                        return Ok(ExitReason::Quit);
                    }
                    Some("") => {}
                    Some(other) => {
                        println!("Unknown command {:?}. Commands: logout, quit", other);
                    }
                }
            }
        }
    }
}

/// Render the table plus summary under the view's current highlights
async fn print_table(rows: &[reqwatch_common::MeetingRequest], view: &Arc<Mutex<MonitorView>>) {
    let view = view.lock().await;
    let highlight_ids = view.highlights().ids();
    print!("{}", render_rows(rows, highlight_ids));
    println!("{}", summary_line(rows.len(), highlight_ids.len()));
}

/// Prompt for the admin secret; `None` means stdin closed
async fn prompt_secret(stdin: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    print!("Admin secret: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let line = stdin.next_line().await.context("Failed to read stdin")?;
    Ok(line.map(|s| s.trim().to_string()))
}
