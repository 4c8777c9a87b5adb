//! Error types for the ordered encoder.

use thiserror::Error;

/// Structured error types for mapping records into ordered values.
///
/// Raised while walking a record with [`to_value`](super::to_value). Every
/// variant is returned to the immediate caller; the encoder never recovers
/// silently.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A map field used a key that does not serialize as a string.
    #[error("map keys must be strings, got {kind}")]
    NonStringKey { kind: String },

    /// A field kind the ordered encoder does not support.
    #[error("unsupported field kind: {kind}")]
    UnsupportedType { kind: String },

    /// An `Option` field in a write record.
    ///
    /// Plain `Option` cannot distinguish "clear this field" from "leave it
    /// alone", so write records express optionality with
    /// [`Tristate`](crate::Tristate) and `Option` fields are rejected
    /// outright.
    #[error("Option fields are not supported in write records, wrap the field in Tristate")]
    OptionField,

    /// Custom error raised by a `Serialize` implementation.
    #[error("encoding failed: {reason}")]
    Message { reason: String },
}

impl EncodeError {
    /// Check if this error reports an unsupported field or key kind.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            EncodeError::NonStringKey { .. }
                | EncodeError::UnsupportedType { .. }
                | EncodeError::OptionField
        )
    }

    /// Get the offending kind name if this error carries one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            EncodeError::NonStringKey { kind } | EncodeError::UnsupportedType { kind } => {
                Some(kind)
            }
            _ => None,
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EncodeError::Message {
            reason: msg.to_string(),
        }
    }
}

// Conversion from EncodeError to the main Error type
impl From<EncodeError> for crate::Error {
    fn from(err: EncodeError) -> Self {
        crate::Error::Encode(err)
    }
}
