//! Dashboard refresh controller.
//!
//! Owns the refresh lifecycle: the auto-refresh timer, the `loading`
//! re-entrancy flag, pause/resume, and teardown. Fetches run in spawned
//! tasks and report back over an mpsc channel; the event loop hands each
//! outcome to `apply`, which is the single place view state gets mutated.
//!
//! Re-entrancy is deliberately asymmetric: a scheduled tick is skipped while
//! a refresh is in flight, a manual refresh always runs. Outcomes that
//! arrive after `stop()` are discarded without touching state.

use crate::client::SiraClient;
use crate::tui::state::{DashboardState, ToastKind};
use sira_common::{Alert, GeneralStats, Snapshot};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Initial,
    Scheduled,
    Manual,
}

/// Outcome of work the controller spawned.
#[derive(Debug)]
pub enum ControllerEvent {
    Refresh {
        kind: RefreshKind,
        result: Result<Snapshot, crate::client::ClientError>,
    },
    AlertResolved {
        id: u64,
        alerts: Vec<Alert>,
    },
    AlertResolveFailed {
        id: u64,
        error: String,
    },
}

pub struct DashboardController {
    client: Arc<SiraClient>,
    tx: mpsc::Sender<ControllerEvent>,
    interval: Duration,
    last_refresh: Instant,
    loading: bool,
    armed: bool,
    stopped: bool,
}

impl DashboardController {
    pub fn new(
        client: Arc<SiraClient>,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<ControllerEvent>) {
        let (tx, rx) = mpsc::channel(32);
        (
            Self {
                client,
                tx,
                interval,
                last_refresh: Instant::now(),
                loading: false,
                armed: false,
                stopped: false,
            },
            rx,
        )
    }

    /// Run the initial refresh and arm the auto-refresh timer.
    pub fn start(&mut self) {
        if self.stopped {
            return;
        }
        self.armed = true;
        self.last_refresh = Instant::now();
        self.spawn_refresh(RefreshKind::Initial);
    }

    /// Called every pass of the event loop. Spawns a scheduled refresh when
    /// the period has elapsed, unless one is already in flight (the tick is
    /// skipped, not queued).
    pub fn tick(&mut self) {
        if self.stopped || !self.armed {
            return;
        }
        if self.last_refresh.elapsed() < self.interval {
            return;
        }
        self.last_refresh = Instant::now();
        if self.loading {
            debug!("refresh already in flight, scheduled tick skipped");
            return;
        }
        self.spawn_refresh(RefreshKind::Scheduled);
    }

    /// Manual refresh: runs regardless of the timer's phase and regardless
    /// of `loading`.
    pub fn refresh_now(&mut self) {
        self.spawn_refresh(RefreshKind::Manual);
    }

    /// Disarm the timer (terminal lost focus). In-flight fetches keep going.
    pub fn pause(&mut self) {
        self.armed = false;
    }

    /// Re-arm the timer (focus regained).
    pub fn resume(&mut self) {
        if !self.stopped {
            self.armed = true;
        }
    }

    /// Teardown. Idempotent; later outcomes are discarded by `apply`.
    pub fn stop(&mut self) {
        self.armed = false;
        self.stopped = true;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn spawn_refresh(&mut self, kind: RefreshKind) {
        if self.stopped {
            return;
        }
        self.loading = true;
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.snapshot().await;
            let _ = tx.send(ControllerEvent::Refresh { kind, result }).await;
        });
    }

    /// Resolve one alert, then re-fetch the alerts section only. The
    /// re-fetch is guarded like any individual resource.
    pub fn resolve_alert(&mut self, id: u64) {
        if self.stopped {
            return;
        }
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.resolve_alert(id).await {
                Ok(()) => {
                    let alerts = match client.active_alerts().await {
                        Ok(alerts) => alerts,
                        Err(error) => {
                            warn!(%error, "alerts re-fetch after resolve failed");
                            Vec::new()
                        }
                    };
                    let _ = tx.send(ControllerEvent::AlertResolved { id, alerts }).await;
                }
                Err(error) => {
                    let _ = tx
                        .send(ControllerEvent::AlertResolveFailed {
                            id,
                            error: error.to_string(),
                        })
                        .await;
                }
            }
        });
    }

    /// Apply one outcome to the view state. No-op after `stop()`.
    pub fn apply(&mut self, state: &mut DashboardState, event: ControllerEvent) {
        if self.stopped {
            return;
        }
        match event {
            ControllerEvent::Refresh { kind, result } => {
                self.loading = false;
                match result {
                    Ok(snapshot) => {
                        state.apply_snapshot(snapshot);
                        if kind == RefreshKind::Initial {
                            state.notify("Dashboard loaded", ToastKind::Success);
                        }
                    }
                    Err(error) => {
                        warn!(%error, "aggregate refresh failed");
                        state.stats.merge(&GeneralStats::fallback());
                        state.notify("Backend unreachable, showing fallback data", ToastKind::Warning);
                    }
                }
            }
            ControllerEvent::AlertResolved { id, alerts } => {
                debug!(id, "alert resolved");
                state.set_alerts(alerts);
                state.notify("Alert resolved", ToastKind::Success);
            }
            ControllerEvent::AlertResolveFailed { id, error } => {
                warn!(id, %error, "alert resolution failed");
                state.notify("Failed to resolve alert", ToastKind::Error);
            }
        }
    }
}
