//! Authentication module for managing user sessions.
//!
//! This module provides `SessionStore`: the single holder of the bearer
//! token and username, persisted across restarts, with the activity
//! timestamp that drives idle timeout.

pub mod session;

pub use session::{SessionData, SessionStore};
