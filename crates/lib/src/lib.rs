//!
//! A typed client for the Directus headless CMS REST API.
//! This library maps typed Rust records onto the CRUD and query surface of a
//! Directus server, covering both the v8 and v9 API dialects.
//!
//! ## Core Concepts
//!
//! The client is built around a few key pieces:
//!
//! * **Client (`client::Client`)**: A cheaply cloneable connection handle carrying the base URL, dialect version, shared bearer token and transport.
//! * **Collections (`client::Collection`)**: The typed CRUD facade for one collection, generic over the read shape `R`, the write shape `W` and the primary key `PK`.
//! * **Values (`value::Value`)**: An ordered JSON-like tree; unlike `serde_json`, object members keep their insertion order all the way to the wire.
//! * **Schemas (`schema::Schema`)**: Explicit field descriptors for read shapes, flattened into the dotted `fields` parameter sent with every read.
//! * **Queries (`query::Query`)**: An immutable filter/sort/pagination builder, encoded per dialect at request time.
//! * **Tri-state fields (`tristate::Tristate`)**: A replacement for `Option` in write shapes that distinguishes "leave untouched" from "clear" from "set".
//!
//! ## API Dialects
//!
//! Directus v8 and v9 accept different query parameter syntax (`filter[f][eq]`
//! vs `filter[f][_eq]`, among others). The dialect lives on the `Client` as an
//! [`ApiVersion`] and only affects encoding; the typed surface is identical.

pub mod client;
pub mod datetime;
pub mod query;
pub mod schema;
pub mod tristate;
pub mod value;

/// Re-export the main handle and facade types for easier access.
pub use client::{Client, Collection, HttpTransport, Method, Request, Transport};
pub use datetime::DateTime;
pub use query::{ApiVersion, Query};
pub use schema::{FieldKind, Model, Schema};
pub use tristate::Tristate;
pub use value::{FieldMap, Value, to_value};

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured encoding errors from the value module
    #[error(transparent)]
    Encode(value::EncodeError),

    /// Structured tri-state access errors from the tristate module
    #[error(transparent)]
    Tristate(tristate::TristateError),

    /// Structured request errors from the client module
    #[error(transparent)]
    Client(client::ClientError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Encode(_) => "value",
            Error::Tristate(_) => "tristate",
            Error::Client(_) => "client",
        }
    }

    /// Check if this error came from encoding a write record.
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Error::Encode(_))
    }

    /// Check if this error is a transport failure.
    pub fn is_transport_error(&self) -> bool {
        match self {
            Error::Client(client_err) => client_err.is_transport(),
            _ => false,
        }
    }

    /// Check if this error is a response status mismatch.
    pub fn is_unexpected_status(&self) -> bool {
        match self {
            Error::Client(client_err) => client_err.is_unexpected_status(),
            _ => false,
        }
    }

    /// Get the response status if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Client(client_err) => client_err.status(),
            _ => None,
        }
    }

    /// Check if this error came from decoding a response body.
    pub fn is_decode_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Client(client_err) => client_err.is_decode(),
            _ => false,
        }
    }

    /// Check if this error came from reading an unset tri-state field.
    pub fn is_not_set(&self) -> bool {
        match self {
            Error::Tristate(tristate_err) => tristate_err.is_not_set(),
            _ => false,
        }
    }
}
