//! Error types for the budtender assistant.

use thiserror::Error;

/// Errors that can occur when asking the assistant for a reply.
///
/// None of these reach a shopper: the bridge swaps them for an apology.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The assistant API returned an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// No assistant is configured.
    #[error("assistant is not configured")]
    Unconfigured,
}

/// Error body returned by the Gemini API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: String,
    pub message: String,
}
