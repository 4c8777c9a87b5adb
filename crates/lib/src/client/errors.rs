//! Error types for client operations.

use thiserror::Error;

/// Structured error types for request execution and response decoding.
///
/// Transport and status errors are surfaced unchanged; the client performs
/// no retries, no backoff and no partial-failure recovery. Callers own retry
/// policy.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure from the request executor.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The response status differed from the operation's expected status.
    #[error("unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        status: u16,
        expected: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode {context}: {reason}")]
    Decode { context: String, reason: String },

    /// A request URL could not be assembled.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ClientError {
    /// Check if this error is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    /// Check if this error is a status mismatch.
    pub fn is_unexpected_status(&self) -> bool {
        matches!(self, ClientError::UnexpectedStatus { .. })
    }

    /// Check if this error is a decoding failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode { .. })
    }

    /// Get the response status if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from ClientError to the main Error type
impl From<ClientError> for crate::Error {
    fn from(err: ClientError) -> Self {
        crate::Error::Client(err)
    }
}
