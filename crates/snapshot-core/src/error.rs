//! Error types for the Snapshot hub client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The hub answered with a non-success status and a JSON body.
    ///
    /// `body` is the parsed response exactly as the hub sent it.
    #[error("Hub rejected request ({status}): {body}")]
    Hub {
        status: u16,
        body: serde_json::Value,
    },

    /// Non-success status whose body was not JSON.
    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Typed data error: {message}")]
    TypedData { message: String },
}

impl Error {
    pub(crate) fn typed_data(message: impl Into<String>) -> Self {
        Error::TypedData {
            message: message.into(),
        }
    }

    /// The hub's structured error body, if this is a hub rejection.
    pub fn hub_body(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Hub { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Hub { status, .. } => Some(*status),
            Error::Api { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hub_body_accessor() {
        let err = Error::Hub {
            status: 404,
            body: json!({"error": "unknown", "error_description": "space not found"}),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.hub_body().unwrap()["error_description"], "space not found");

        let other = Error::UnsupportedMessageType("poll".to_string());
        assert!(other.hub_body().is_none());
        assert!(other.status().is_none());
        assert_eq!(other.to_string(), "Unsupported message type: poll");
    }
}
