use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date format the API uses for expense timestamps
const EXPENSE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "receiptPath")]
    pub receipt_path: Option<String>,
    pub date: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Expense {
    /// Parse the API's `dd-MM-yyyy HH:mm` timestamp. Returns `None` for
    /// anything that doesn't match; callers fall back to the raw string.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, EXPENSE_DATE_FORMAT).ok()
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Payload for creating an expense. The server stamps the date and adds
/// unknown categories to the catalog on its own.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "receiptPath", skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,
}

/// Search filters for the expense list. Empty filters fetch everything.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Render the filter as query pairs, skipping unset fields.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(ref category) = self.category {
            if !category.is_empty() {
                pairs.push(("category".to_string(), category.clone()));
            }
        }
        if let Some(ref keyword) = self.keyword {
            if !keyword.is_empty() {
                pairs.push(("keyword".to_string(), keyword.clone()));
            }
        }
        if let Some(min) = self.min_amount {
            pairs.push(("minAmount".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_amount {
            pairs.push(("maxAmount".to_string(), max.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate".to_string(), start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate".to_string(), end.to_string()));
        }
        pairs
    }
}
