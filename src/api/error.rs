use thiserror::Error;

/// Fallback when a failure response carries no usable message
const GENERIC_FAILURE: &str = "Request failed";

/// Maximum length for error messages lifted from response bodies
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Typed request errors. Callers branch on the kind, not on message
/// text.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the bearer token outside of login/signup.
    /// The session has already been torn down by the time this is
    /// returned.
    #[error("Session expired. Please log in again.")]
    AuthExpired,

    /// Any other non-success response. The message comes from the
    /// response body's `error` field when one exists.
    #[error("{message}")]
    RequestFailed { message: String },

    /// Transport-level failure before a response was obtained.
    #[error("Network error: {0}")]
    NetworkFailure(#[from] reqwest::Error),
}

impl ApiError {
    /// Build a `RequestFailed` from a failure response body.
    ///
    /// The body is expected to be `{"error": "..."}` but anything else
    /// (HTML error pages, empty bodies) falls back to a generic message.
    pub fn from_body(body: &str) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        ApiError::RequestFailed {
            message: Self::truncate(&message),
        }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            message: Self::truncate(&message.into()),
        }
    }

    fn truncate(message: &str) -> String {
        if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
            message.to_string()
        } else {
            let mut end = MAX_ERROR_MESSAGE_LENGTH;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &message[..end])
        }
    }
}

/// Pull the `error` field out of a JSON failure body, if there is one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_error_field() {
        let err = ApiError::from_body(r#"{"error":"Username already exists"}"#);
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[test]
    fn test_non_json_body_falls_back_to_generic() {
        let err = ApiError::from_body("<html>502 Bad Gateway</html>");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_empty_error_field_falls_back_to_generic() {
        let err = ApiError::from_body(r#"{"error":""}"#);
        assert_eq!(err.to_string(), GENERIC_FAILURE);

        let err = ApiError::from_body(r#"{"message":"not the right field"}"#);
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_long_message_is_truncated() {
        let long = "x".repeat(2000);
        let err = ApiError::from_body(&format!(r#"{{"error":"{}"}}"#, long));
        assert!(err.to_string().len() <= MAX_ERROR_MESSAGE_LENGTH + 3);
        assert!(err.to_string().ends_with("..."));
    }
}
