//! Notification channels between the session core and the presentation layer.
//!
//! The core never touches rendering. It publishes `SessionNotice` values on
//! a channel and lets whatever front end is attached decide how to react
//! (show the login screen, pop a toast, etc.). In the other direction,
//! user activity arrives as `Interaction` events so the idle clock is not
//! tied to any particular input technology.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::auth::SessionStore;

/// Why a session ended. `TimedOut` is reported distinctly from a manual
/// logout so the front end can word the message accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The server rejected the bearer token mid-session.
    Expired,
    /// The user logged out explicitly.
    LoggedOut,
    /// The idle monitor hit the inactivity timeout.
    TimedOut,
}

/// Session lifecycle events published to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    /// Login or signup succeeded; show the authenticated view.
    Established { username: String },
    /// The session will expire soon unless the user does something.
    ExpiryWarning { remaining: Duration },
    /// The session is gone; return to the unauthenticated view.
    Ended(EndReason),
}

/// A tracked user interaction. Mirrors the activation events that reset
/// the idle clock: pointer activation and key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    PointerActivation,
    KeyPress,
}

pub type NoticeSender = mpsc::UnboundedSender<SessionNotice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<SessionNotice>;

/// Create the notice channel. The core holds the sender; the front end
/// drains the receiver from its event loop.
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Create the interaction channel. Input handlers hold the sender.
pub fn interaction_channel() -> (
    mpsc::UnboundedSender<Interaction>,
    mpsc::UnboundedReceiver<Interaction>,
) {
    mpsc::unbounded_channel()
}

/// Drain interaction events and refresh the session activity clock.
///
/// Runs until every sender is dropped. Spawn it next to the idle monitor:
///
/// ```no_run
/// # use std::sync::{Arc, Mutex};
/// # use tallybook::auth::SessionStore;
/// # use tallybook::notify::{interaction_channel, track_interactions};
/// # async fn demo(store: Arc<Mutex<SessionStore>>) {
/// let (tx, rx) = interaction_channel();
/// tokio::spawn(track_interactions(rx, store));
/// # }
/// ```
pub async fn track_interactions(
    mut rx: mpsc::UnboundedReceiver<Interaction>,
    store: Arc<Mutex<SessionStore>>,
) {
    while let Some(event) = rx.recv().await {
        debug!(?event, "interaction recorded");
        if let Ok(mut store) = store.lock() {
            store.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    #[tokio::test]
    async fn test_track_interactions_touches_store() {
        let mut store = SessionStore::in_memory();
        store.set_last_activity(Utc::now() - ChronoDuration::minutes(10));
        let stale = store.last_activity();
        let store = Arc::new(Mutex::new(store));

        let (tx, rx) = interaction_channel();
        let handle = tokio::spawn(track_interactions(rx, Arc::clone(&store)));

        tx.send(Interaction::KeyPress).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert!(store.lock().unwrap().last_activity() > stale);
    }

    #[test]
    fn test_end_reasons_are_distinct() {
        assert_ne!(EndReason::TimedOut, EndReason::LoggedOut);
        assert_ne!(EndReason::TimedOut, EndReason::Expired);
    }
}
