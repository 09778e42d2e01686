use serde::{Deserialize, Serialize};

/// An expense the server materializes automatically on login, on the
/// configured interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub interval: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRecurringExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub interval: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
}

/// A payment reminder, ordered by due date server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReminder {
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recurring_from_api() {
        let json = r#"{"id":3,"description":"Rent","amount":15000.00,"category":"Housing","interval":"monthly","startDate":"2026-01-01"}"#;
        let rec: RecurringExpense = serde_json::from_str(json).unwrap();
        assert_eq!(rec.interval, "monthly");
        assert_eq!(rec.start_date, "2026-01-01");
    }

    #[test]
    fn test_parse_reminder_null_notes() {
        let json = r#"{"id":2,"title":"Pay electricity","dueDate":"2026-09-05","notes":null}"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(reminder.notes, None);
    }

    #[test]
    fn test_new_reminder_skips_empty_notes() {
        let reminder = NewReminder {
            title: "Insurance".to_string(),
            due_date: "2026-10-01".to_string(),
            notes: None,
        };
        let json = serde_json::to_value(&reminder).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["dueDate"], "2026-10-01");
    }
}
