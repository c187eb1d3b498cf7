//! Error handling module for the inventory admin core.
//!
//! Provides the client-side error type with classification of HTTP failures into stable codes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const REJECTED: &str = "REJECTED";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 400 from the server
    BadRequest(String),
    /// 401, the token is missing or expired
    Unauthorized(String),
    /// 403
    Forbidden(String),
    /// 404
    NotFound(String),
    /// 422 with per-field messages
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },
    /// 429
    RateLimited(String),
    /// 5xx
    Server { status: u16, message: String },
    /// Any other non-2xx status
    Http { status: u16, message: String },
    /// The request never produced a response
    Network(String),
    /// The response body was not the expected envelope
    Decode(String),
    /// Token persistence failed
    Storage(String),
    /// An action reported failure without an underlying error
    Rejected(String),
    /// The client could not be configured (bad base URL, TLS setup)
    Config(String),
}

/// A single validation message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ClientError {
    /// Get the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Validation { .. } => Some(422),
            ClientError::RateLimited(_) => Some(429),
            ClientError::Server { status, .. } | ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(_)
            | ClientError::Decode(_)
            | ClientError::Storage(_)
            | ClientError::Rejected(_)
            | ClientError::Config(_) => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::BadRequest(_) => codes::BAD_REQUEST,
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::Forbidden(_) => codes::FORBIDDEN,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Validation { .. } => codes::VALIDATION_ERROR,
            ClientError::RateLimited(_) => codes::RATE_LIMITED,
            ClientError::Server { .. } => codes::SERVER_ERROR,
            ClientError::Http { .. } => codes::HTTP_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
            ClientError::Rejected(_) => codes::REJECTED,
            ClientError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::BadRequest(msg)
            | ClientError::Unauthorized(msg)
            | ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::RateLimited(msg)
            | ClientError::Network(msg)
            | ClientError::Decode(msg)
            | ClientError::Storage(msg)
            | ClientError::Rejected(msg)
            | ClientError::Config(msg) => msg.clone(),
            ClientError::Validation { message, .. } => message.clone(),
            ClientError::Server { message, .. } | ClientError::Http { message, .. } => {
                message.clone()
            }
        }
    }

    /// Authentication failures invalidate the persisted token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Classify a non-2xx response.
    ///
    /// `body` is the raw response text; a JSON body is searched for a
    /// `message`, `error` or `detail` key, a plain string body is used as is.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let extracted = parsed
            .as_ref()
            .and_then(extract_message)
            .or_else(|| {
                let trimmed = body.trim();
                (parsed.is_none() && !trimmed.is_empty()).then(|| trimmed.to_string())
            });

        match status {
            400 => ClientError::BadRequest(
                extracted.unwrap_or_else(|| "Invalid request. Please check your input.".into()),
            ),
            401 => ClientError::Unauthorized("Authentication required. Please log in again.".into()),
            403 => ClientError::Forbidden(
                "You do not have permission to perform this action.".into(),
            ),
            404 => ClientError::NotFound("The requested resource was not found.".into()),
            422 => ClientError::Validation {
                message: extracted
                    .unwrap_or_else(|| "Validation failed. Please check your input.".into()),
                fields: parsed.as_ref().map(extract_field_errors).unwrap_or_default(),
            },
            429 => ClientError::RateLimited(
                "Too many requests. Please wait a moment and try again.".into(),
            ),
            500..=599 => ClientError::Server {
                status,
                message: "Server error. Please try again later.".into(),
            },
            _ => ClientError::Http {
                status,
                message: format!(
                    "Request failed with status {}. {}",
                    status,
                    extracted.unwrap_or_default()
                )
                .trim_end()
                .to_string(),
            },
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Unexpected response body: {}", err))
        } else {
            ClientError::Network(
                "Network connection error. Please check your internet connection.".into(),
            )
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(format!("Storage error: {}", err))
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Laravel-style `{"errors": {"field": ["msg", ...]}}`.
fn extract_field_errors(value: &serde_json::Value) -> Vec<FieldError> {
    let Some(errors) = value.get("errors").and_then(|e| e.as_object()) else {
        return Vec::new();
    };

    // BTreeMap keeps field order stable regardless of the JSON map backend
    let sorted: BTreeMap<&String, &serde_json::Value> = errors.iter().collect();
    let mut out = Vec::new();
    for (field, messages) in sorted {
        match messages {
            serde_json::Value::Array(list) => {
                for msg in list.iter().filter_map(|m| m.as_str()) {
                    out.push(FieldError {
                        field: field.clone(),
                        message: msg.to_string(),
                    });
                }
            }
            serde_json::Value::String(msg) => out.push(FieldError {
                field: field.clone(),
                message: msg.clone(),
            }),
            _ => {}
        }
    }
    out
}
