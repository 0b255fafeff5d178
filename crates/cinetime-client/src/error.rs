use reqwest::StatusCode;
use thiserror::Error;

/// Normalized failure of a backend call.
///
/// HTTP failures keep the payload's `message` field when the backend sent
/// one, so call sites can surface it verbatim and fall back to their own
/// fixed string otherwise.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .message.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized { message: Option<String> },

    #[error("{}", .message.as_deref().unwrap_or("Not found"))]
    NotFound { message: Option<String> },

    #[error("{}", .message.as_deref().unwrap_or("Bad request"))]
    BadRequest { status: u16, message: Option<String> },

    #[error("server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing {0}")]
    MissingData(&'static str),

    /// Rejected before any request was sent
    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build the error for a non-success status from the raw response body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound { message },
            400 | 422 => ApiError::BadRequest { status: status.as_u16(), message },
            code => ApiError::Server { status: code, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::BadRequest { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// 400/404, both used by the episode store to mean "nothing stored yet"
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
            || matches!(self, ApiError::BadRequest { status: 400, .. })
    }

    /// Message from the backend payload, if it sent one
    pub fn payload_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::BadRequest { message, .. }
            | ApiError::Server { message, .. } => message.as_deref(),
            ApiError::InvalidRequest(message) => Some(message),
            _ => None,
        }
    }

    /// Text to show the user: payload message when present, otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.payload_message().unwrap_or(fallback).to_string()
    }
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()))
        .filter(|m| !m.trim().is_empty())
}
