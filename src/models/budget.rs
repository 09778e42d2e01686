use serde::{Deserialize, Serialize};

/// A category budget with the amount spent against it this month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub spent: f64,
    pub limit: f64,
}

impl BudgetStatus {
    /// Spend as a percentage of the limit. A zero limit reads as 0%.
    pub fn percent_used(&self) -> f64 {
        if self.limit > 0.0 {
            self.spent / self.limit * 100.0
        } else {
            0.0
        }
    }

    pub fn is_over(&self) -> bool {
        self.percent_used() >= 100.0
    }
}

/// A budget nearing or past its limit, as flagged by the dashboard.
/// The server only emits these at 80% and above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub spent: f64,
    pub limit: f64,
    pub percent: f64,
}
