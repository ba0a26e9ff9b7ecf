//! Keep-alive reachability monitor.
//!
//! A background task pings the store on a fixed interval. Each check is
//! retried a bounded number of times with exponential backoff, and the
//! outcome is published on a watch channel that `/health` reads from.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration};

use holonet_graph::CharacterStore;

/// Keep-alive scheduling and retry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeepaliveConfig {
    /// Run the background check at all.
    pub enabled: bool,

    /// Seconds between checks (default: every 4 hours).
    pub interval_secs: u64,

    /// Ping attempts per check before it counts as failed.
    pub max_attempts: u32,

    /// Delay before the first retry; doubled after each further failure.
    pub retry_backoff_ms: u64,

    /// Consecutive failed checks before the state turns `unreachable`.
    pub failure_threshold: u32,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 4 * 60 * 60,
            max_attempts: 3,
            retry_backoff_ms: 2_000,
            failure_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// No check has completed yet.
    Unknown,
    Healthy,
    /// Recent checks failed, below the alert threshold.
    Degraded,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub state: HealthState,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            state: HealthState::Unknown,
            last_checked: None,
            last_success: None,
            consecutive_failures: 0,
        }
    }
}

/// Shared handle to the latest health snapshot. Clone is cheap.
#[derive(Clone)]
pub struct HealthMonitor {
    tx: Arc<watch::Sender<HealthSnapshot>>,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthMonitor {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(HealthSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.tx.borrow().clone()
    }

    /// Receive every state change as it is published.
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.tx.subscribe()
    }

    fn record_success(&self, at: DateTime<Utc>) -> HealthSnapshot {
        self.tx.send_modify(|s| {
            s.state = HealthState::Healthy;
            s.last_checked = Some(at);
            s.last_success = Some(at);
            s.consecutive_failures = 0;
        });
        self.snapshot()
    }

    fn record_failure(&self, at: DateTime<Utc>, threshold: u32) -> HealthSnapshot {
        self.tx.send_modify(|s| {
            s.consecutive_failures = s.consecutive_failures.saturating_add(1);
            s.last_checked = Some(at);
            s.state = if s.consecutive_failures >= threshold.max(1) {
                HealthState::Unreachable
            } else {
                HealthState::Degraded
            };
        });
        self.snapshot()
    }
}

/// Run one check: ping with bounded retry, then publish the outcome.
pub async fn check_once<S: CharacterStore>(
    store: &S,
    config: &KeepaliveConfig,
    monitor: &HealthMonitor,
) -> HealthSnapshot {
    let attempts = config.max_attempts.max(1);
    let mut backoff = Duration::from_millis(config.retry_backoff_ms);

    for attempt in 1..=attempts {
        match store.ping().await {
            Ok(()) => {
                tracing::info!(attempt, "Keep-alive check succeeded");
                return monitor.record_success(Utc::now());
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts = attempts, error = %e, "Keep-alive ping failed");
                if attempt < attempts {
                    sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
            }
        }
    }

    let snapshot = monitor.record_failure(Utc::now(), config.failure_threshold);
    if snapshot.state == HealthState::Unreachable {
        tracing::error!(
            consecutive_failures = snapshot.consecutive_failures,
            "Store unreachable"
        );
    }
    snapshot
}

/// Spawn the periodic check. The first check runs immediately.
pub fn spawn<S: CharacterStore>(
    store: S,
    config: KeepaliveConfig,
    monitor: HealthMonitor,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_secs.max(1)));
        loop {
            ticker.tick().await;
            tracing::info!("Running keep-alive check");
            check_once(&store, &config, &monitor).await;
        }
    })
}
