//! API client for communicating with the Expense Tracker REST API.
//!
//! This module provides the `ApiClient` struct: a generic request
//! pipeline (`call`) that handles bearer credentials, authentication
//! failure teardown, and CSV/JSON content negotiation, plus typed
//! methods for every endpoint the server exposes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{
    BudgetStatus, DashboardSummary, Expense, ExpenseFilter, MonthlyReport, NewExpense,
    NewRecurringExpense, NewReminder, Predictions, RecurringExpense, Reminder, TrendPoint,
};
use crate::notify::{EndReason, NoticeSender, SessionNotice};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Paths allowed to answer 401 without tearing down the session: a bad
/// password is not an expired session.
const AUTH_ATTEMPT_PATHS: [&str; 2] = ["/api/login", "/api/signup"];

/// Content type the export endpoint uses for CSV downloads
const CSV_CONTENT_TYPE: &str = "text/csv";

// ============================================================================
// Request / response types
// ============================================================================

/// A caller-constructed outbound request: path, method, optional query
/// pairs and JSON body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            method: Method::POST,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            method: Method::PUT,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::DELETE,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Whether this request is itself a login/signup attempt.
    fn is_auth_attempt(&self) -> bool {
        AUTH_ATTEMPT_PATHS.iter().any(|p| self.path.starts_with(p))
    }
}

/// What a successful call resolved to.
#[derive(Debug, Clone)]
pub enum ApiPayload {
    /// Parsed structured body, returned unchanged.
    Json(Value),
    /// Raw bytes from an export-style endpoint.
    Binary(Vec<u8>),
}

impl ApiPayload {
    /// Decode the JSON payload into a typed model. Binary payloads and
    /// shape mismatches fail as `RequestFailed`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiPayload::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::request_failed(format!("Unexpected response shape: {e}"))),
            ApiPayload::Binary(_) => {
                Err(ApiError::request_failed("Unexpected binary response"))
            }
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, ApiError> {
        match self {
            ApiPayload::Binary(bytes) => Ok(bytes),
            ApiPayload::Json(_) => Err(ApiError::request_failed("Expected a binary response")),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct AuthResponse {
    token: String,
    username: String,
}

// ============================================================================
// Client
// ============================================================================

/// API client for the Expense Tracker backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<Mutex<SessionStore>>,
    notices: Option<NoticeSender>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<Mutex<SessionStore>>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            store,
            notices: None,
        })
    }

    /// Attach the channel that carries session notices to the
    /// presentation layer.
    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = Some(notices);
        self
    }

    fn store(&self) -> MutexGuard<'_, SessionStore> {
        // A poisoned lock only means a panic elsewhere; session state is
        // plain assignments, safe to keep using.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, notice: SessionNotice) {
        if let Some(ref tx) = self.notices {
            let _ = tx.send(notice);
        }
    }

    /// Clear the session before any error reaches the caller, so a
    /// subsequent call never sees stale credentials.
    fn teardown(&self, reason: EndReason) {
        self.store().clear();
        self.notify(SessionNotice::Ended(reason));
    }

    // ===== Generic request pipeline =====

    /// Issue a request described by the caller and classify the outcome.
    ///
    /// - 401 outside login/signup tears the session down and fails with
    ///   `AuthExpired`, without reading the body.
    /// - A `text/csv` response resolves to raw bytes.
    /// - Any other non-success status fails with `RequestFailed`,
    ///   carrying the body's `error` field when present.
    /// - A success body is parsed as JSON and returned unchanged.
    pub async fn call(&self, descriptor: &RequestDescriptor) -> Result<ApiPayload, ApiError> {
        let url = format!("{}{}", self.base_url, descriptor.path);
        let token = self.store().token().map(str::to_string);

        let mut request = self
            .client
            .request(descriptor.method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(ref body) = descriptor.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && !descriptor.is_auth_attempt() {
            debug!(path = %descriptor.path, "Bearer token rejected, tearing down session");
            self.teardown(EndReason::Expired);
            return Err(ApiError::AuthExpired);
        }

        let is_csv = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(CSV_CONTENT_TYPE));
        if is_csv {
            let bytes = response.bytes().await?;
            return Ok(ApiPayload::Binary(bytes.to_vec()));
        }

        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            debug!(path = %descriptor.path, status = %status, "Request failed");
            return Err(ApiError::from_body(&body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ApiError::request_failed(format!("Invalid JSON in response: {e}")))?;
        Ok(ApiPayload::Json(value))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.call(&RequestDescriptor::get(path).with_query(query))
            .await?
            .decode()
    }

    async fn post(&self, path: &str, body: Value) -> Result<(), ApiError> {
        self.call(&RequestDescriptor::post(path, body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, query: Vec<(String, String)>) -> Result<(), ApiError> {
        self.call(&RequestDescriptor::delete(path).with_query(query))
            .await?;
        Ok(())
    }

    // ===== Session endpoints =====

    /// Log in, establish the session, and return the display username.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("/api/login", username, password).await
    }

    /// Create an account; the server logs the new user straight in.
    pub async fn signup(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("/api/signup", username, password).await
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let auth: AuthResponse = self
            .call(&RequestDescriptor::post(
                path,
                json!({ "username": username, "password": password }),
            ))
            .await?
            .decode()?;

        if let Err(e) = self.store().save(&auth.token, &auth.username) {
            // The session still works in memory for this run.
            warn!(error = %e, "Failed to persist session");
        }
        self.notify(SessionNotice::Established {
            username: auth.username.clone(),
        });
        Ok(auth.username)
    }

    /// Explicit logout. Local teardown only: the server keeps no state
    /// worth revoking beyond the token mapping it will age out.
    pub fn logout(&self) {
        self.teardown(EndReason::LoggedOut);
    }

    /// Probe whether a restored session is still accepted by the server.
    ///
    /// `Ok(false)` means the token was rejected (and the session is
    /// already cleared); other failures propagate so the caller can
    /// distinguish "logged out" from "server unreachable".
    pub async fn verify_session(&self) -> Result<bool, ApiError> {
        match self.categories().await {
            Ok(_) => Ok(true),
            Err(ApiError::AuthExpired) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Change the account password.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        self.post(
            "/api/profile",
            json!({ "currentPassword": current, "newPassword": new }),
        )
        .await
    }

    // ===== Expenses =====

    pub async fn expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError> {
        self.get("/api/expenses", filter.to_query()).await
    }

    pub async fn add_expense(&self, expense: &NewExpense) -> Result<(), ApiError> {
        let body = serde_json::to_value(expense)
            .map_err(|e| ApiError::request_failed(format!("Unencodable expense: {e}")))?;
        self.post("/api/expenses", body).await
    }

    pub async fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
        self.delete("/api/expenses", vec![("id".to_string(), id.to_string())])
            .await
    }

    /// Download the full expense ledger as CSV bytes.
    pub async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.call(&RequestDescriptor::get("/api/export"))
            .await?
            .into_bytes()
    }

    // ===== Categories =====

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.get("/api/categories", Vec::new()).await
    }

    pub async fn add_category(&self, name: &str) -> Result<(), ApiError> {
        self.post("/api/categories", json!({ "name": name })).await
    }

    pub async fn delete_category(&self, name: &str) -> Result<(), ApiError> {
        self.delete(
            "/api/categories",
            vec![("name".to_string(), name.to_string())],
        )
        .await
    }

    // ===== Budgets =====

    pub async fn budgets(&self) -> Result<Vec<BudgetStatus>, ApiError> {
        self.get("/api/budgets", Vec::new()).await
    }

    pub async fn budget_status(&self) -> Result<Vec<BudgetStatus>, ApiError> {
        self.get("/api/budget-status", Vec::new()).await
    }

    pub async fn set_budget(&self, category: &str, limit: f64) -> Result<(), ApiError> {
        self.post("/api/budgets", json!({ "category": category, "limit": limit }))
            .await
    }

    pub async fn remove_budget(&self, category: &str) -> Result<(), ApiError> {
        self.delete(
            "/api/budgets",
            vec![("category".to_string(), category.to_string())],
        )
        .await
    }

    // ===== Recurring expenses =====

    pub async fn recurring(&self) -> Result<Vec<RecurringExpense>, ApiError> {
        self.get("/api/recurring", Vec::new()).await
    }

    pub async fn add_recurring(&self, schedule: &NewRecurringExpense) -> Result<(), ApiError> {
        let body = serde_json::to_value(schedule)
            .map_err(|e| ApiError::request_failed(format!("Unencodable schedule: {e}")))?;
        self.post("/api/recurring", body).await
    }

    pub async fn delete_recurring(&self, id: i64) -> Result<(), ApiError> {
        self.delete("/api/recurring", vec![("id".to_string(), id.to_string())])
            .await
    }

    // ===== Reminders =====

    pub async fn reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        self.get("/api/reminders", Vec::new()).await
    }

    pub async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), ApiError> {
        let body = serde_json::to_value(reminder)
            .map_err(|e| ApiError::request_failed(format!("Unencodable reminder: {e}")))?;
        self.post("/api/reminders", body).await
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<(), ApiError> {
        self.delete("/api/reminders", vec![("id".to_string(), id.to_string())])
            .await
    }

    // ===== Dashboard & analytics =====

    pub async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.get("/api/dashboard", Vec::new()).await
    }

    pub async fn predictions(&self) -> Result<Predictions, ApiError> {
        self.get("/api/predictions", Vec::new()).await
    }

    pub async fn trends(&self, months: u32) -> Result<Vec<TrendPoint>, ApiError> {
        self.get(
            "/api/trends",
            vec![("months".to_string(), months.to_string())],
        )
        .await
    }

    /// Per-day totals for one month, keyed by day of month.
    pub async fn daily_spending(
        &self,
        month: u32,
        year: i32,
    ) -> Result<HashMap<u32, f64>, ApiError> {
        self.get(
            "/api/daily-spending",
            vec![
                ("month".to_string(), month.to_string()),
                ("year".to_string(), year.to_string()),
            ],
        )
        .await
    }

    pub async fn report(&self, month: u32, year: i32) -> Result<MonthlyReport, ApiError> {
        self.get(
            "/api/report",
            vec![
                ("month".to_string(), month.to_string()),
                ("year".to_string(), year.to_string()),
            ],
        )
        .await
    }
}
