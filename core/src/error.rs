//! Error types for the review-me API client.
//!
//! # Design
//! Every non-2xx response becomes `ClientError::Api`, carrying the status and
//! a user-facing message from `api_error_message`. A 2xx body that does not
//! match the expected shape is a `Decode` error rather than a silently
//! mistyped value. Transport failures are passed through as text.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn from_status(status: u16) -> Self {
        ClientError::Api {
            status,
            message: api_error_message(status),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Human-readable message shown to users for a failed response status.
pub fn api_error_message(status: u16) -> String {
    match status {
        400 => "bad request: the server could not process the submitted data".to_string(),
        401 => "unauthorized: please sign in again".to_string(),
        403 => "forbidden: the access code does not grant access to this page".to_string(),
        404 => "not found: the requested review or group does not exist".to_string(),
        500..=599 => "server error: please try again in a moment".to_string(),
        other => format!("unexpected response status {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = ClientError::from_status(404);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn server_errors_share_a_message() {
        for status in [500, 502, 503, 599] {
            let err = ClientError::from_status(status);
            assert_eq!(err.status(), Some(status));
            assert!(err.to_string().contains("server error"), "status {status}");
        }
    }

    #[test]
    fn unknown_status_mentions_code() {
        assert_eq!(api_error_message(418), "unexpected response status 418");
    }

    #[test]
    fn non_api_errors_have_no_status() {
        let err = ClientError::Decode("missing field `formId`".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
