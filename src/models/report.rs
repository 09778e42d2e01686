use serde::{Deserialize, Serialize};

use super::BudgetAlert;

/// Short month labels for chart axes, indexed 1-12
const MONTH_LABELS: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Current-month snapshot for the dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "monthlyTotal", default)]
    pub monthly_total: f64,
    #[serde(rename = "topCategory", default)]
    pub top_category: String,
    #[serde(rename = "expenseCount", default)]
    pub expense_count: i64,
    /// Display label like "August 2026"
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub recent: Vec<RecentExpense>,
    #[serde(rename = "budgetAlerts", default)]
    pub budget_alerts: Vec<BudgetAlert>,
}

/// Trimmed-down expense rows in the dashboard's recent list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentExpense {
    pub category: String,
    pub amount: f64,
    pub date: String,
}

/// One month of the spending trend series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl TrendPoint {
    /// Axis label like "Aug 2026". Out-of-range months render as "?".
    pub fn label(&self) -> String {
        let name = MONTH_LABELS.get(self.month as usize).copied().unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Per-category breakdown for a single month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub total: f64,
    pub breakdown: Vec<CategoryAmount>,
}

impl MonthlyReport {
    /// Largest single category amount, for bar scaling. Zero when empty.
    pub fn max_amount(&self) -> f64 {
        self.breakdown.iter().fold(0.0, |max, c| max.max(c.amount))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPrediction {
    pub category: String,
    pub predicted: f64,
}

/// Projected next-month spend from the trailing average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predictions {
    #[serde(rename = "totalPredicted", default)]
    pub total_predicted: f64,
    #[serde(default)]
    pub categories: Vec<CategoryPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_from_api() {
        let json = r#"{
            "monthlyTotal": 4521.75,
            "topCategory": "Food",
            "expenseCount": 18,
            "month": "August 2026",
            "recent": [{"category":"Food","amount":120.00,"date":"28-08-2026 12:05"}],
            "budgetAlerts": [{"category":"Food","spent":4000.00,"limit":4500.00,"percent":88.9}]
        }"#;
        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.expense_count, 18);
        assert_eq!(summary.recent.len(), 1);
        assert_eq!(summary.budget_alerts[0].category, "Food");
    }

    #[test]
    fn test_dashboard_missing_fields_default() {
        // Sparse months come back with whatever the server computed.
        let summary: DashboardSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.monthly_total, 0.0);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_trend_point_label() {
        let point = TrendPoint {
            year: 2026,
            month: 8,
            total: 1250.0,
        };
        assert_eq!(point.label(), "Aug 2026");

        let bad = TrendPoint {
            year: 2026,
            month: 13,
            total: 0.0,
        };
        assert_eq!(bad.label(), "? 2026");
    }

    #[test]
    fn test_report_max_amount() {
        let report = MonthlyReport {
            total: 300.0,
            breakdown: vec![
                CategoryAmount {
                    category: "A".to_string(),
                    amount: 100.0,
                },
                CategoryAmount {
                    category: "B".to_string(),
                    amount: 200.0,
                },
            ],
        };
        assert_eq!(report.max_amount(), 200.0);

        let empty = MonthlyReport {
            total: 0.0,
            breakdown: vec![],
        };
        assert_eq!(empty.max_amount(), 0.0);
    }
}
