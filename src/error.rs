//! Error types.
//!
//! The rendering core never returns these across its API: decode failures
//! become an empty path and missing anchors skip positioning. Only the HTTP
//! clients surface errors, and the suggest input converts them to a message.

use thiserror::Error;

/// Why an encoded polyline could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid polyline character {0:?} at byte {1}")]
    InvalidChar(char, usize),

    #[error("polyline ended inside a value")]
    Truncated,

    #[error("polyline ended after a latitude without a longitude")]
    MissingLongitude,

    #[error("polyline value at byte {0} overflows")]
    Overflow(usize),

    #[error("polyline decoded to a non-finite coordinate")]
    NonFinite,
}

/// The anchor element is not mounted, so the dropdown cannot be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("anchor geometry unavailable")]
pub struct GeometryUnavailable;

/// Places search failures.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("places request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("places service returned status {0}")]
    Status(u16),

    #[error("places service error: {0}")]
    Service(String),

    #[error("failed to decode places response: {0}")]
    Decode(String),
}

impl SearchError {
    /// Short message suitable for showing under the input.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(message) => message.clone(),
            Self::Http(_) | Self::Status(_) | Self::Decode(_) => {
                "Address search failed. Please try again.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Trip-planning failures.
#[derive(Error, Debug)]
pub enum TripError {
    #[error("trip request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("trip service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("trip log {0} not found")]
    LogNotFound(u64),

    #[error("failed to decode trip service response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for TripError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_passes_through() {
        let err = SearchError::Service("Places API key not configured".to_string());
        assert_eq!(err.user_message(), "Places API key not configured");
    }

    #[test]
    fn test_status_message_is_generic() {
        let err = SearchError::Status(502);
        assert_eq!(err.user_message(), "Address search failed. Please try again.");
        assert_eq!(err.to_string(), "places service returned status 502");
    }

    #[test]
    fn test_json_error_converts() {
        let err: SearchError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::InvalidChar(' ', 3).to_string(),
            "invalid polyline character ' ' at byte 3"
        );
    }
}
