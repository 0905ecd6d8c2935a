//! hebbd - Hebbian network simulation daemon
//!
//! Owns one network, its tick driver and the snake world, ticks them on a
//! timer while running, and serves edits from clients over a JSON-lines TCP
//! socket.
//!
//! Config location:
//! - Linux: ~/.local/share/hebbnet/config.json
//! - Windows: %APPDATA%\hebbnet\config.json
//! - MacOS: ~/Library/Application Support/hebbnet/config.json

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hebbnet::error::NetError;
use hebbnet::protocol::{encode_line, Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod paths;
mod session;

use config::{BusyPolicy, DaemonConfig};
use paths::AppPaths;
use session::Session;

// ═══════════════════════════════════════════════════════════════════════════
// Daemon State
// ═══════════════════════════════════════════════════════════════════════════

struct Daemon {
    session: RwLock<Session>,
    busy_policy: BusyPolicy,
    /// Set by the ticker only while it is inside `Session::tick`.
    ticking: AtomicBool,
    /// Cancels the ticker task of the current run, if any.
    ticker: Mutex<Option<CancellationToken>>,
    shutdown: CancellationToken,
}

impl Daemon {
    fn new(session: Session, busy_policy: BusyPolicy) -> Arc<Self> {
        Arc::new(Self {
            session: RwLock::new(session),
            busy_policy,
            ticking: AtomicBool::new(false),
            ticker: Mutex::new(None),
            shutdown: CancellationToken::new(),
        })
    }

    fn cancel_ticker(&self) {
        let mut slot = self.ticker.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }

    /// Replace any running ticker with a fresh one using `period`.
    fn spawn_ticker(self: &Arc<Self>, period: Duration) {
        let token = self.shutdown.child_token();
        {
            let mut slot = self.ticker.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(old) = slot.replace(token.clone()) {
                old.cancel();
            }
        }
        let daemon = Arc::clone(self);
        tokio::spawn(async move { daemon.run_ticker(period, token).await });
    }

    async fn run_ticker(&self, period: Duration, token: CancellationToken) {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(?period, "ticker running");
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {}
            }
            let mut s = self.session.write().await;
            // A stop may have landed while we waited for the lock.
            if token.is_cancelled() {
                break;
            }
            self.ticking.store(true, Ordering::Release);
            let report = s.tick(std::time::Instant::now());
            self.ticking.store(false, Ordering::Release);
            if report.is_none() {
                break;
            }
        }
        debug!("ticker exited");
    }

    /// Serve one request under the session lock, then adjust the ticker.
    async fn serve(self: &Arc<Self>, request: Request) -> Response {
        if !request.is_mutation() {
            let s = self.session.read().await;
            if let Some(resp) = s.query(&request) {
                return resp;
            }
        }

        // Readers and lifecycle requests always wait their turn; only a graph
        // edit racing an in-flight tick is turned away under `reject`.
        if self.busy_policy == BusyPolicy::Reject
            && request.is_graph_edit()
            && self.ticking.load(Ordering::Acquire)
        {
            debug!(?request, "rejecting edit during tick");
            return NetError::Busy.into();
        }
        let mut s = self.session.write().await;

        let was_running = s.is_running();
        let old_period = s.period();
        let shutdown = matches!(request, Request::Shutdown);
        let response = s.apply(request);

        match (was_running, s.is_running()) {
            (false, true) => self.spawn_ticker(s.period()),
            (true, false) => self.cancel_ticker(),
            (true, true) if s.period() != old_period => self.spawn_ticker(s.period()),
            _ => {}
        }
        if shutdown {
            self.cancel_ticker();
        }
        response
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

async fn handle_client(
    stream: TcpStream,
    daemon: Arc<Daemon>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid request: {}", e);
                let resp = Response::error("invalid_request", format!("Invalid request: {e}"));
                writer.write_all(encode_line(&resp)?.as_bytes()).await?;
                continue;
            }
        };

        let shutdown = matches!(request, Request::Shutdown);
        let response = daemon.serve(request).await;
        writer.write_all(encode_line(&response)?.as_bytes()).await?;
        writer.flush().await?;

        if shutdown {
            info!("Shutdown requested");
            daemon.shutdown.cancel();
            break;
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let paths = AppPaths::new()?;
    info!("Data directory: {:?}", paths.data_dir());
    let cfg = DaemonConfig::load_or_default(&paths.config_file())?;
    info!(
        tick_period_ms = cfg.tick_period_ms,
        busy_policy = ?cfg.busy_policy,
        "configuration loaded"
    );

    let daemon = Daemon::new(Session::new(&cfg)?, cfg.busy_policy);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("hebbd listening on {}", cfg.listen_addr);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = daemon.shutdown.cancelled() => break,
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    error!("Ctrl-C handler failed: {}", e);
                }
                info!("Ctrl-C received");
                daemon.shutdown.cancel();
                break;
            }
            accepted = listener.accept() => {
                let (stream, addr) = accepted?;
                info!("Client connected: {}", addr);
                let daemon = Arc::clone(&daemon);
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, daemon).await {
                        error!("Client handler error: {}", e);
                    }
                });
            }
        }
    }

    info!("hebbd stopped");
    Ok(())
}
