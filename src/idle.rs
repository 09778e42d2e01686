//! Idle-timeout monitoring.
//!
//! `IdleMonitor` polls the session's activity clock on a fixed interval
//! and forces a logout once the inactivity timeout is reached. The
//! timeout teardown is reported as `TimedOut`, distinct from a manual
//! logout. Shortly before expiry it emits a single `ExpiryWarning` so
//! the front end can prompt the user; any new activity re-arms the
//! warning.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::auth::SessionStore;
use crate::notify::{EndReason, NoticeSender, SessionNotice};

/// How often the idle clock is checked
const POLL_INTERVAL_SECS: u64 = 60;

/// Inactivity timeout in minutes
const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Warning lead time before the timeout in minutes
const WARNING_BUFFER_MINUTES: i64 = 5;

pub struct IdleMonitor {
    store: Arc<Mutex<SessionStore>>,
    notices: Option<NoticeSender>,
    timeout: Duration,
    warning_buffer: Duration,
    poll_interval: std::time::Duration,
    warned: bool,
}

impl IdleMonitor {
    pub fn new(store: Arc<Mutex<SessionStore>>) -> Self {
        Self {
            store,
            notices: None,
            timeout: Duration::minutes(SESSION_TIMEOUT_MINUTES),
            warning_buffer: Duration::minutes(WARNING_BUFFER_MINUTES),
            poll_interval: std::time::Duration::from_secs(POLL_INTERVAL_SECS),
            warned: false,
        }
    }

    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn store(&self) -> MutexGuard<'_, SessionStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, notice: SessionNotice) {
        if let Some(ref tx) = self.notices {
            let _ = tx.send(notice);
        }
    }

    /// One tick of the idle clock. Separated from the timer loop so the
    /// decision logic is driven by an explicit `now`.
    pub fn check(&mut self, now: DateTime<Utc>) {
        let mut store = self.store();
        if !store.is_active() {
            drop(store);
            self.warned = false;
            return;
        }

        if store.is_expired(now, self.timeout) {
            store.clear();
            drop(store);
            info!("Session timed out due to inactivity");
            self.notify(SessionNotice::Ended(EndReason::TimedOut));
            self.warned = false;
            return;
        }

        let elapsed = now - store.last_activity();
        drop(store);

        if elapsed >= self.timeout - self.warning_buffer {
            if !self.warned {
                self.warned = true;
                let remaining = (self.timeout - elapsed).to_std().unwrap_or_default();
                self.notify(SessionNotice::ExpiryWarning { remaining });
            }
        } else {
            // Activity since the warning re-arms it.
            self.warned = false;
        }
    }

    /// Run the monitor until the owning task is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.check(Utc::now());
        }
    }
}
