//! Error types for geteq.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in geteq operations.
#[derive(Error, Debug)]
pub enum GeteqError {
    /// Real-time `--mag` value outside the fixed bucket set
    #[error("--mag option invalid: {0:?} (expected: all, 1.0, 2.5, 4.5, major)")]
    InvalidMagnitudeOption(String),

    /// Real-time `--time` value outside the fixed window set
    #[error("--time interval option invalid: {0:?} (expected: hour, day, week, month)")]
    InvalidTimeOption(String),

    /// `--output` value not supported by the target endpoint
    #[error("--output format option invalid: {0:?}")]
    InvalidFormatOption(String),

    /// Free-form magnitude expression could not be parsed
    #[error("--magnitude expression invalid: {0:?}")]
    InvalidMagnitude(String),

    /// Free-form time range expression could not be parsed
    #[error("--time range invalid: {0:?} (expected: START,END as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)")]
    InvalidTimeRange(String),

    /// Event id contains disallowed characters
    #[error("event id invalid: {0:?}")]
    InvalidEventId(String),

    /// Response body does not have the expected GeoJSON shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    TransportFailure(#[from] reqwest::Error),

    /// Request URL could not be assembled
    #[error("invalid request URL: {0}")]
    Url(String),

    /// Writing to the terminal failed
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GeteqError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
