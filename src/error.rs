use std::fmt;

use serde::Serialize;

/// Secondary fields recovered from an error body.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Failure value for a non-2xx response.
///
/// Produced by [`crate::classify`]. The status code is always present.
/// Metadata is only set when the body had a recognized shape. The message is
/// also set for a JSON object with no recognized shape, to the reason phrase
/// of the status code when it has one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// HTTP status code of the failed response.
    pub status_code: u16,
    /// Human-readable message taken from the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured fields taken from the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl HttpError {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            message: None,
            metadata: None,
        }
    }

    /// Returns `true` for 4xx status codes.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Returns `true` for 5xx status codes.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Returns a string-valued metadata field.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "http error {}: {}", self.status_code, message),
            None => write!(f, "http error {}", self.status_code),
        }
    }
}

impl std::error::Error for HttpError {}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum WatsonError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code, classified from the response body.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// Success response whose body does not match the expected type.
    #[error("decode error: {0}")]
    Decode(String),
    /// Client could not be configured.
    #[error("config error: {0}")]
    Config(String),
}

impl WatsonError {
    /// Returns the HTTP status code of a classified non-2xx response.
    ///
    /// Transport errors never carry one: they are raised before a response
    /// exists or while reading a successful body.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(err) => Some(err.status_code),
            Self::Transport(_) | Self::Decode(_) | Self::Config(_) => None,
        }
    }
}
