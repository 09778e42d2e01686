//! Tallybook client core - the non-rendering half of a personal expense
//! tracker.
//!
//! This crate owns the session lifecycle (bearer token + username,
//! persisted across restarts), the authenticated request pipeline with
//! auth-failure teardown and CSV content negotiation, the idle-timeout
//! monitor, and the typed models for every endpoint of the Expense
//! Tracker API. Presentation layers consume it through typed results
//! and the `SessionNotice` channel.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//!
//! use tallybook::api::ApiClient;
//! use tallybook::auth::SessionStore;
//! use tallybook::config::Config;
//! use tallybook::idle::IdleMonitor;
//! use tallybook::notify::notice_channel;
//!
//! # async fn wire() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let mut store = SessionStore::new(Config::data_dir()?);
//! store.load();
//! let store = Arc::new(Mutex::new(store));
//!
//! let (notices, mut notice_rx) = notice_channel();
//! let client = ApiClient::new(config.base_url.clone(), Arc::clone(&store))?
//!     .with_notices(notices.clone());
//! tokio::spawn(IdleMonitor::new(Arc::clone(&store)).with_notices(notices).run());
//!
//! let restored = store.lock().unwrap().is_active();
//! let authenticated = restored && client.verify_session().await?;
//! # let _ = (authenticated, notice_rx);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod idle;
pub mod models;
pub mod notify;

pub use api::{ApiClient, ApiError, ApiPayload, RequestDescriptor};
pub use auth::SessionStore;
pub use config::{Config, Theme};
pub use idle::IdleMonitor;
pub use notify::{EndReason, Interaction, SessionNotice};
