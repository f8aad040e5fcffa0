//! # Slice Errors
//!
//! Every failure a slice operation can meet is one of the [`SliceError`] variants.
//! Failures that happen on the I/O side of an operation never escape to the caller as
//! `Err`: they are normalized into an [`ErrorInfo`] and folded into the slice state, so
//! the view can render them next to the last good data.

use serde::{Deserialize, Serialize};

/// Errors that can occur within the slice framework and its remote client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SliceError {
    /// The payload was rejected locally before anything was dispatched.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request never produced an HTTP response (connect, DNS, reset, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("Backend rejected request ({status}): {message}")]
    Domain {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The backend answered 2xx but the body did not match the expected schema.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Store closed")]
    StoreClosed,

    #[error("Store dropped response channel")]
    StoreDropped,
}

impl SliceError {
    /// A request payload that could not be serialized. Nothing was sent.
    pub fn invalid_payload(err: serde_json::Error) -> Self {
        SliceError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for SliceError {
    fn from(err: serde_json::Error) -> Self {
        SliceError::Decode(err.to_string())
    }
}

/// The error shape kept in [`ResourceState`](crate::ResourceState) for the view to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub code: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            message: message.into(),
            code: code.map(str::to_string),
        }
    }
}

impl From<&SliceError> for ErrorInfo {
    fn from(err: &SliceError) -> Self {
        match err {
            SliceError::Validation(msg) => ErrorInfo::new(msg.clone(), Some("validation")),
            SliceError::Transport(msg) => ErrorInfo::new(msg.clone(), Some("transport")),
            SliceError::Timeout => ErrorInfo::new(err.to_string(), Some("timeout")),
            SliceError::Domain {
                status,
                message,
                code,
            } => ErrorInfo {
                message: message.clone(),
                code: Some(code.clone().unwrap_or_else(|| format!("http_{}", status))),
            },
            SliceError::Decode(msg) => ErrorInfo::new(msg.clone(), Some("decode")),
            SliceError::StoreClosed | SliceError::StoreDropped => {
                ErrorInfo::new(err.to_string(), Some("store_closed"))
            }
        }
    }
}

impl From<SliceError> for ErrorInfo {
    fn from(err: SliceError) -> Self {
        ErrorInfo::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_keeps_backend_code() {
        let err = SliceError::Domain {
            status: 422,
            message: "Invoice already stamped".to_string(),
            code: Some("CFDI_STAMPED".to_string()),
        };
        let info = ErrorInfo::from(&err);
        assert_eq!(info.message, "Invoice already stamped");
        assert_eq!(info.code.as_deref(), Some("CFDI_STAMPED"));
    }

    #[test]
    fn domain_error_without_code_falls_back_to_status() {
        let err = SliceError::Domain {
            status: 503,
            message: "Service Unavailable".to_string(),
            code: None,
        };
        assert_eq!(ErrorInfo::from(err).code.as_deref(), Some("http_503"));
    }

    #[test]
    fn transport_and_timeout_are_tagged() {
        let info = ErrorInfo::from(SliceError::Transport("connection refused".into()));
        assert_eq!(info.code.as_deref(), Some("transport"));
        assert_eq!(info.message, "connection refused");

        let info = ErrorInfo::from(SliceError::Timeout);
        assert_eq!(info.code.as_deref(), Some("timeout"));
    }

    #[test]
    fn unserializable_payload_is_a_validation_error() {
        let mut payload = std::collections::BTreeMap::new();
        payload.insert((1u8, 2u8), "pair keys");
        let err = serde_json::to_value(&payload)
            .map_err(SliceError::invalid_payload)
            .unwrap_err();
        assert!(matches!(err, SliceError::Validation(_)));
        assert_eq!(ErrorInfo::from(&err).code.as_deref(), Some("validation"));
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: SliceError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, SliceError::Decode(_)));
    }
}
