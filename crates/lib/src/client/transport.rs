//! Request execution.
//!
//! [`Transport`] is the seam between the typed facade and the HTTP stack:
//! the facade describes a request, the transport executes it, checks the
//! status and returns the raw body. [`HttpTransport`] is the production
//! implementation over a shared reqwest client; tests swap in an in-process
//! implementation instead.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::errors::ClientError;
use crate::Result;
use crate::value::Value;

/// HTTP verb for a request descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// The verb name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully described API request, ready for execution.
///
/// The facade builds one of these per operation; everything the transport
/// needs is in the descriptor, so transports stay stateless.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL without query parameters.
    pub url: String,
    /// Query parameters, appended to the URL in map order.
    pub params: BTreeMap<String, String>,
    /// JSON body; ordered values keep their member order on the wire.
    pub body: Option<Value>,
    /// Status the operation requires; anything else is an error.
    pub expected_status: u16,
    /// Bearer token attached as the Authorization header.
    pub token: Option<String>,
}

/// Executes request descriptors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return the raw response body.
    ///
    /// Returns [`ClientError::UnexpectedStatus`] when the response status
    /// differs from [`Request::expected_status`], with the body captured for
    /// diagnostics.
    async fn execute(&self, request: Request) -> Result<Vec<u8>>;
}

/// Production transport over a shared reqwest connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> Result<Vec<u8>> {
        let mut url = Url::parse(&request.url).map_err(|e| ClientError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self.client.request(method, url);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ClientError::Transport {
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| ClientError::Transport {
            reason: e.to_string(),
        })?;

        if status != request.expected_status {
            return Err(ClientError::UnexpectedStatus {
                status,
                expected: request.expected_status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }
            .into());
        }

        debug!(status, bytes = bytes.len(), "request completed");

        Ok(bytes.to_vec())
    }
}
