use thiserror::Error;

/// Failure talking to the task service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network unreachable, timeout, or connection dropped
    #[error("could not reach the task service: {0}")]
    Transport(String),

    /// Non-2xx response; `detail` is the server's human-readable reason when it sent one
    #[error("{}", rejected_message(.status, .detail))]
    Rejected { status: u16, detail: Option<String> },

    /// 2xx response whose body did not match the expected shape
    #[error("unexpected response from the task service: {0}")]
    Decode(String),
}

fn rejected_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request rejected with status {}", status),
    }
}

impl ApiError {
    /// Server-provided explanation, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server detail verbatim, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// Failure of a mutate-then-reload round trip
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The change itself was not applied
    #[error("{0}")]
    Mutate(#[source] ApiError),

    /// The change went through but the follow-up reload failed
    #[error("saved, but refreshing tasks failed: {0}")]
    Reload(#[source] ApiError),
}

impl MutationError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            MutationError::Mutate(e) | MutationError::Reload(e) => e,
        }
    }
}

/// Pull `detail` out of an error body like `{"detail": "name is required"}`.
/// Validation errors send a list instead of a string; those yield None.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_body() {
        assert_eq!(
            detail_from_body(r#"{"detail":"Date is in the past"}"#),
            Some("Date is in the past".to_string())
        );
        assert_eq!(detail_from_body(r#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(detail_from_body("Internal Server Error"), None);
        assert_eq!(detail_from_body(r#"{"detail":"  "}"#), None);
    }

    #[test]
    fn test_rejected_display_prefers_detail() {
        let with_detail = ApiError::Rejected {
            status: 400,
            detail: Some("name is required".to_string()),
        };
        assert_eq!(with_detail.to_string(), "name is required");

        let bare = ApiError::Rejected {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "request rejected with status 500");
    }

    #[test]
    fn test_user_message_fallback() {
        let transport = ApiError::Transport("connection refused".to_string());
        assert_eq!(transport.user_message("Could not parse that"), "Could not parse that");

        let rejected = ApiError::Rejected {
            status: 400,
            detail: Some("Unknown weekday".to_string()),
        };
        assert_eq!(rejected.user_message("Could not parse that"), "Unknown weekday");
    }

    #[test]
    fn test_mutation_error_messages() {
        let err = MutationError::Reload(ApiError::Transport("timed out".to_string()));
        assert_eq!(
            err.to_string(),
            "saved, but refreshing tasks failed: could not reach the task service: timed out"
        );
        assert!(matches!(err.api_error(), ApiError::Transport(_)));
    }
}
