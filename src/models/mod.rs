//! Data models for Expense Tracker API payloads.
//!
//! This module contains the structures exchanged with the remote API:
//!
//! - `Expense`, `NewExpense`, `ExpenseFilter`: the expense ledger
//! - `BudgetStatus`, `BudgetAlert`: budgets and their consumption
//! - `RecurringExpense`, `Reminder`: schedules and payment reminders
//! - Dashboard/analytics types: `DashboardSummary`, `TrendPoint`,
//!   `MonthlyReport`, `Predictions`
//!
//! Field names follow the API's camelCase wire format via serde renames.

pub mod budget;
pub mod expense;
pub mod report;
pub mod schedule;

pub use budget::{BudgetAlert, BudgetStatus};
pub use expense::{Expense, ExpenseFilter, NewExpense};
pub use report::{
    CategoryAmount, CategoryPrediction, DashboardSummary, MonthlyReport, Predictions,
    RecentExpense, TrendPoint,
};
pub use schedule::{NewRecurringExpense, NewReminder, RecurringExpense, Reminder};
