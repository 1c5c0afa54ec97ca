//! Unified error handling for the client.
//!
//! Every API-facing operation returns `Result<T, ApiError>`. The one branch
//! that matters most in this taxonomy is `Unauthorized` vs `SessionExpired`:
//! a guest request bouncing off a protected endpoint is an expected outcome
//! and stays `Unauthorized`, while a failed refresh for a previously
//! authenticated user becomes `SessionExpired` - the application-level signal
//! to send the user back to the login entry point.

use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type for API access.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request (non-2xx or `success: false`).
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Server-provided message, when present.
        message: Option<String>,
    },

    /// An authorization failure that is not eligible for (further) refresh.
    ///
    /// Raised for guest requests hitting protected endpoints and for
    /// requests that still fail after the single refresh-and-retry.
    #[error("{}", .message.as_deref().unwrap_or("unauthorized"))]
    Unauthorized {
        /// Server-provided message, when present.
        message: Option<String>,
    },

    /// Token refresh failed for a previously-authenticated user; both tokens
    /// have been cleared and the user must log in again.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Durable storage failed while persisting session state.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = ApiError::Api {
            status: 400,
            message: Some("Table not found".to_string()),
        };
        assert_eq!(err.to_string(), "Table not found");

        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "request failed");
    }

    #[test]
    fn test_unauthorized_display() {
        let err = ApiError::Unauthorized { message: None };
        assert_eq!(err.to_string(), "unauthorized");

        let err = ApiError::Unauthorized {
            message: Some("Login required".to_string()),
        };
        assert_eq!(err.to_string(), "Login required");
    }
}
