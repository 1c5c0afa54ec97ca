//! The JSON envelope every backend response is wrapped in.

use serde::{Deserialize, Serialize};

/// Wire-level response wrapper: `{ success, data?, message? }`.
///
/// Every endpoint of the ordering API responds with this shape. `data` is
/// present on success, `message` carries a human-readable explanation on
/// failure (and occasionally on success).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// `#[serde(default)]` on `data` needs a helper that does not require
// `T: Default`.
fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A failed envelope carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_success_shape() {
        let envelope: ApiEnvelope<Vec<String>> =
            serde_json::from_str(r#"{"success":true,"data":["a","b"]}"#).expect("deserialize");
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec!["a".to_owned(), "b".to_owned()]));
        assert_eq!(envelope.message, None);
    }

    #[test]
    fn test_deserializes_failure_without_data() {
        let envelope: ApiEnvelope<Vec<String>> =
            serde_json::from_str(r#"{"success":false,"message":"Invalid credentials"}"#)
                .expect("deserialize");
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Invalid credentials"));
    }
}
