//! REST API client module for the Expense Tracker backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! expense API: a generic `call` pipeline plus typed endpoint methods.
//!
//! The API uses opaque bearer tokens obtained through the login and
//! signup endpoints; an unauthorized response anywhere else tears the
//! session down.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiPayload, RequestDescriptor};
pub use error::ApiError;
