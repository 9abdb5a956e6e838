//! Dashboard view state.
//!
//! Holds what is currently on screen. Snapshots are merged in: a section the
//! backend omitted keeps its previous rendering, and within the headline
//! stats each absent scalar keeps its previous value. Values never reset to
//! the fallback constants once real data has been shown.

use chrono::{DateTime, Local};
use sira_common::{
    Alert, GeneralStats, InstrumentSet, InstrumentStats, ProcedureStats, RecentCount, Snapshot,
};
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One transient notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created: Instant,
}

/// Headline stats as displayed. Every field always has a value: seeded from
/// the fallback constants, then overwritten field-by-field as the backend
/// reports real numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub registered_instruments: u64,
    pub successful_identifications: u64,
    pub avg_time: String,
    pub accuracy: String,
    pub identifications_today: u64,
    pub avg_time_today: String,
    pub accuracy_today: String,
    pub active_users: u64,
}

impl Default for StatsView {
    fn default() -> Self {
        let mut view = Self {
            registered_instruments: 0,
            successful_identifications: 0,
            avg_time: String::new(),
            accuracy: String::new(),
            identifications_today: 0,
            avg_time_today: String::new(),
            accuracy_today: String::new(),
            active_users: 0,
        };
        view.merge(&GeneralStats::fallback());
        view
    }
}

impl StatsView {
    /// Overwrite only the fields the backend reported.
    pub fn merge(&mut self, stats: &GeneralStats) {
        if let Some(v) = stats.registered_instruments {
            self.registered_instruments = v;
        }
        if let Some(v) = stats.successful_identifications {
            self.successful_identifications = v;
        }
        if let Some(v) = &stats.avg_time {
            self.avg_time = v.clone();
        }
        if let Some(v) = &stats.accuracy {
            self.accuracy = v.clone();
        }
        if let Some(v) = stats.identifications_today {
            self.identifications_today = v;
        }
        if let Some(v) = &stats.avg_time_today {
            self.avg_time_today = v.clone();
        }
        if let Some(v) = &stats.accuracy_today {
            self.accuracy_today = v.clone();
        }
        if let Some(v) = stats.active_users {
            self.active_users = v;
        }
    }
}

/// Everything the renderer projects into a frame.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub stats: StatsView,
    pub alerts: Vec<Alert>,
    pub instruments: InstrumentStats,
    pub procedures: ProcedureStats,
    pub recent_counts: Vec<RecentCount>,
    pub instrument_sets: Vec<InstrumentSet>,

    /// Index into `alerts` for the resolve action.
    pub selected_alert: usize,

    pub toasts: Vec<Toast>,
    pub loading: bool,
    /// Mirrors the controller's timer state for the footer.
    pub auto_paused: bool,
    pub last_update: Option<DateTime<Local>>,
}

impl DashboardState {
    /// Merge one refresh cycle's snapshot. `None` sections stay as they are.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(general) = &snapshot.general {
            self.stats.merge(general);
        }
        if let Some(alerts) = snapshot.alerts {
            self.set_alerts(alerts);
        }
        if let Some(instruments) = snapshot.instruments {
            self.instruments = instruments;
        }
        if let Some(procedures) = snapshot.procedures {
            self.procedures = procedures;
        }
        if let Some(counts) = snapshot.recent_counts {
            self.recent_counts = counts;
        }
        if let Some(sets) = snapshot.instrument_sets {
            self.instrument_sets = sets;
        }
        self.last_update = Some(Local::now());
    }

    /// Replace the alerts section, keeping the selection in range.
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
        if self.selected_alert >= self.alerts.len() {
            self.selected_alert = self.alerts.len().saturating_sub(1);
        }
    }

    pub fn select_next_alert(&mut self) {
        if !self.alerts.is_empty() {
            self.selected_alert = (self.selected_alert + 1).min(self.alerts.len() - 1);
        }
    }

    pub fn select_prev_alert(&mut self) {
        self.selected_alert = self.selected_alert.saturating_sub(1);
    }

    pub fn selected_alert_id(&self) -> Option<u64> {
        self.alerts.get(self.selected_alert).map(|a| a.id)
    }

    /// Append a toast. No queue, no rate limit: overlapping toasts stack.
    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            created: Instant::now(),
        });
    }

    /// Drop toasts older than `TOAST_TTL` as of `now`.
    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.duration_since(t.created) < TOAST_TTL);
    }

    pub fn dismiss_toasts(&mut self) {
        self.toasts.clear();
    }
}
