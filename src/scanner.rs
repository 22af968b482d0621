use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinSet;

use crate::error::ScanError;
use crate::probe::Probe;
use crate::protocol::{DeviceRecord, Event, ScanProgress, ScanSummary};
use crate::resolve::Resolve;
use crate::target::Target;

/// Tunables for a scan session. Defaults mirror a home-network sweep:
/// a sub-second probe timeout and enough workers to cover a /24 quickly.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub probe_timeout: Duration,
    pub resolve_timeout: Duration,
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(800),
            resolve_timeout: Duration::from_millis(1_000),
            concurrency: 120,
        }
    }
}

/// Lifecycle of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Enumerating,
    Scanning,
    Completed,
    Cancelled,
    Failed,
}

/// Orchestrates the scan lifecycle: enumerates the target, dispatches
/// probes to a bounded worker pool, funnels completions through a single
/// aggregation loop, and emits the event protocol to the sink channel.
///
/// At most one session is active per coordinator. Probers and resolvers
/// are injected so the engine runs against fakes in tests.
pub struct ScanCoordinator<P, R> {
    target: String,
    config: ScanConfig,
    prober: Arc<P>,
    resolver: Arc<R>,
    events: mpsc::Sender<Event>,
    state: Arc<Mutex<SessionState>>,
    results: Arc<Mutex<Vec<DeviceRecord>>>,
    cancel: watch::Sender<bool>,
}

impl<P, R> ScanCoordinator<P, R>
where
    P: Probe + 'static,
    R: Resolve + 'static,
{
    pub fn new(
        target: impl Into<String>,
        config: ScanConfig,
        prober: P,
        resolver: R,
        events: mpsc::Sender<Event>,
    ) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            target: target.into(),
            config,
            prober: Arc::new(prober),
            resolver: Arc::new(resolver),
            events,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            results: Arc::new(Mutex::new(Vec::new())),
            cancel,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Devices discovered by the current or most recent session, in
    /// arrival order. Cleared when the next session starts.
    pub fn results(&self) -> Vec<DeviceRecord> {
        self.results.lock().unwrap().clone()
    }

    /// Begin a session. Rejects with [`ScanError::AlreadyRunning`] while
    /// one is active; the running session is never cancelled implicitly.
    /// The session runs in the background and reports through the event
    /// channel, including the `error` path for a malformed target.
    pub fn start_scan(&self) -> Result<(), ScanError> {
        {
            let mut state = self.state.lock().unwrap();
            if matches!(*state, SessionState::Enumerating | SessionState::Scanning) {
                return Err(ScanError::AlreadyRunning);
            }
            *state = SessionState::Enumerating;
        }
        self.results.lock().unwrap().clear();
        let _ = self.cancel.send(false);

        let session = Session {
            target: self.target.clone(),
            config: self.config.clone(),
            prober: self.prober.clone(),
            resolver: self.resolver.clone(),
            events: self.events.clone(),
            state: self.state.clone(),
            results: self.results.clone(),
            cancel: self.cancel.subscribe(),
        };
        tokio::spawn(session.run());
        Ok(())
    }

    /// Cooperatively cancel the active session. In-flight probes are
    /// abandoned; a single terminal `done` event follows with the count
    /// discovered so far. No-op when nothing is running.
    pub fn cancel_scan(&self) {
        let _ = self.cancel.send(true);
    }
}

struct Session<P, R> {
    target: String,
    config: ScanConfig,
    prober: Arc<P>,
    resolver: Arc<R>,
    events: mpsc::Sender<Event>,
    state: Arc<Mutex<SessionState>>,
    results: Arc<Mutex<Vec<DeviceRecord>>>,
    cancel: watch::Receiver<bool>,
}

impl<P, R> Session<P, R>
where
    P: Probe + 'static,
    R: Resolve + 'static,
{
    async fn run(self) {
        let addresses = match Target::parse(&self.target) {
            Ok(target) => target.addresses(),
            Err(e) => {
                self.set_state(SessionState::Failed);
                self.emit(Event::Error { msg: e.to_string() }).await;
                return;
            }
        };
        let total = addresses.len();
        self.set_state(SessionState::Scanning);
        tracing::debug!(total, target = %self.target, "enumeration complete");

        self.emit(Event::Info {
            msg: format!("scanning {} ({} addresses)", self.target, total),
        })
        .await;
        self.emit(Event::Progress {
            data: ScanProgress { done: 0, total },
        })
        .await;

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let (tx, mut rx) = mpsc::channel::<Option<DeviceRecord>>(total.max(1));
        let mut workers = JoinSet::new();

        for address in addresses {
            let semaphore = semaphore.clone();
            let prober = self.prober.clone();
            let resolver = self.resolver.clone();
            let tx = tx.clone();
            let probe_timeout = self.config.probe_timeout;
            let resolve_timeout = self.config.resolve_timeout;
            workers.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                let result = prober.probe(address, probe_timeout).await;
                let device = if result.reachable {
                    let hostname = resolver.resolve(address, resolve_timeout).await;
                    Some(DeviceRecord {
                        ip: address,
                        hostname,
                    })
                } else {
                    None
                };
                let _ = tx.send(device).await;
            });
        }
        drop(tx);

        let mut cancel = self.cancel.clone();
        let mut done = 0usize;
        let mut found = 0usize;
        let mut cancelled = *cancel.borrow();
        while !cancelled && done < total {
            tokio::select! {
                changed = cancel.changed() => {
                    // An Err means the coordinator is gone and nobody is
                    // left to observe the session.
                    if changed.is_err() || *cancel.borrow() {
                        cancelled = true;
                    }
                }
                completion = rx.recv() => {
                    match completion {
                        Some(device) => {
                            if let Some(record) = device {
                                found += 1;
                                self.results.lock().unwrap().push(record.clone());
                                self.emit(Event::Found { data: record }).await;
                            }
                            done += 1;
                            self.emit(Event::Progress {
                                data: ScanProgress { done, total },
                            })
                            .await;
                        }
                        None => {
                            tracing::warn!(done, total, "worker pool exited early");
                            let err = ScanError::Internal("worker pool exited early".to_string());
                            self.set_state(SessionState::Failed);
                            self.emit(Event::Error { msg: err.to_string() }).await;
                            return;
                        }
                    }
                }
            }
        }

        if cancelled {
            workers.abort_all();
            tracing::debug!(done, total, "session cancelled");
        }
        // Store the terminal state before the terminal event goes out,
        // so a consumer that saw it can start the next session at once.
        self.set_state(if cancelled {
            SessionState::Cancelled
        } else {
            SessionState::Completed
        });
        self.emit(Event::Done {
            data: ScanSummary { count: found },
        })
        .await;
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap() = state;
    }

    async fn emit(&self, event: Event) {
        if self.events.send(event).await.is_err() {
            tracing::debug!("event sink closed, dropping event");
        }
    }
}
