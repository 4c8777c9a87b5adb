//! Typed access to API collections.
//!
//! [`Client`] is a cheaply cloneable connection handle holding the base URL,
//! the dialect version, the shared bearer token and the transport.
//! [`Collection`] is the typed CRUD facade for one collection, generic over
//! the read shape `R`, the write shape `W` and the primary key `PK`.
//!
//! Every read-returning operation asks the server for exactly the leaf
//! field paths of `R` via the `fields` parameter, so decoded records are
//! complete. Response bodies arrive wrapped in a `{"data": ...}` envelope;
//! request bodies are sent bare.

mod errors;
mod transport;

pub use errors::ClientError;
pub use transport::{HttpTransport, Method, Request, Transport};

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::query::{ApiVersion, Query};
use crate::schema::{Model, field_paths_for};
use crate::value::{FieldMap, Value, to_value};

/// Response envelope wrapping every JSON body the server returns.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Connection handle for one API server.
///
/// Cheap to clone; clones share the bearer token, so [`set_token`] on any
/// handle is visible to all of them. Configure with the `with_*` builders
/// before handing out clones or [`collection`] facades.
///
/// [`set_token`]: Client::set_token
/// [`collection`]: Client::collection
///
/// # Example
///
/// ```no_run
/// use directus_client::{Client, Query};
/// use directus_client::schema::{FieldKind, Model, Schema};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct FruitR {
///     id: i64,
///     name: String,
/// }
///
/// impl Model for FruitR {
///     fn schema() -> Schema {
///         Schema::new()
///             .field("id", FieldKind::Int)
///             .field("name", FieldKind::Text)
///     }
/// }
///
/// #[derive(Serialize)]
/// struct FruitW {
///     name: String,
/// }
///
/// # async fn run() -> directus_client::Result<()> {
/// let client = Client::new("https://cms.example.com").with_token("secret");
/// let fruits = client.collection::<FruitR, FruitW, i64>("fruits");
///
/// let created = fruits.insert(&FruitW { name: "mango".into() }).await?;
/// let found = fruits.get(&created.id).await?;
/// let all = fruits.list(&Query::none().sort_asc("name")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base_url: String,
    version: ApiVersion,
    token: Arc<RwLock<Option<String>>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for `base_url` with the [`ApiVersion::V9`] dialect,
    /// no token and the production HTTP transport.
    ///
    /// A trailing slash on the base URL is trimmed so item URLs join
    /// cleanly.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            version: ApiVersion::V9,
            token: Arc::new(RwLock::new(None)),
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Select the dialect used for query encoding.
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the bearer token attached to every request.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Replace the transport.
    ///
    /// Tests use this to execute requests in-process instead of over HTTP.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Update the shared bearer token.
    ///
    /// The new token is used by every clone of this client and every
    /// [`Collection`] created from one.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The dialect used for query encoding.
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Exchange email/password credentials for a bearer token.
    ///
    /// Posts to `{base}/auth/authenticate` without authentication. The token
    /// is returned, not stored; pass it to [`set_token`](Client::set_token)
    /// or [`with_token`](Client::with_token) to use it.
    pub async fn create_token(&self, email: &str, password: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct TokenData {
            token: String,
        }

        let body = FieldMap::new().set("email", email).set("password", password);
        let request = Request {
            method: Method::Post,
            url: format!("{}/auth/authenticate", self.base_url),
            params: BTreeMap::new(),
            body: Some(Value::Map(body)),
            expected_status: 200,
            token: None,
        };
        let bytes = self.transport.execute(request).await?;
        let envelope: Envelope<TokenData> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
                context: "token response".to_string(),
                reason: e.to_string(),
            })?;
        Ok(envelope.data.token)
    }

    /// Typed facade for one collection.
    ///
    /// `R` is the shape reads decode into, `W` the shape writes encode from
    /// and `PK` the primary key type formatted into item URLs. The facade
    /// holds a clone of this client, so a later
    /// [`set_token`](Client::set_token) still applies to it.
    pub fn collection<R, W, PK>(&self, name: impl Into<String>) -> Collection<R, W, PK>
    where
        R: Model + for<'de> Deserialize<'de> + 'static,
        W: Serialize,
        PK: fmt::Display,
    {
        Collection {
            client: self.clone(),
            name: name.into(),
            phantom: PhantomData,
        }
    }
}

/// Typed CRUD facade for one collection.
///
/// Created by [`Client::collection`]. All operations attach the client's
/// current bearer token and decode responses out of the `{"data": ...}`
/// envelope. Write payloads built from `W` go through [`to_value`], so
/// member order follows declaration order and `Option` fields are rejected
/// in favor of [`Tristate`](crate::Tristate).
pub struct Collection<R, W, PK>
where
    R: Model + for<'de> Deserialize<'de> + 'static,
    W: Serialize,
    PK: fmt::Display,
{
    client: Client,
    name: String,
    phantom: PhantomData<(R, W, PK)>,
}

impl<R, W, PK> Collection<R, W, PK>
where
    R: Model + for<'de> Deserialize<'de> + 'static,
    W: Serialize,
    PK: fmt::Display,
{
    /// The collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn items_url(&self) -> String {
        format!("{}/items/{}", self.client.base_url, self.name)
    }

    fn item_url(&self, pk: &PK) -> String {
        format!("{}/items/{}/{pk}", self.client.base_url, self.name)
    }

    /// The `fields` parameter listing the leaf paths of `R`.
    fn fields_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("fields".to_string(), field_paths_for::<R>().join(","));
        params
    }

    /// Execute a request and decode the enveloped response.
    async fn fetch<T>(&self, request: Request) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let bytes = self.client.transport.execute(request).await?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
                context: format!("`{}` response", self.name),
                reason: e.to_string(),
            })?;
        Ok(envelope.data)
    }

    /// Insert a full write record and return the stored read record.
    pub async fn insert(&self, record: &W) -> Result<R> {
        let body = to_value(record)?;
        let request = Request {
            method: Method::Post,
            url: self.items_url(),
            params: self.fields_params(),
            body: Some(body),
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }

    /// Create a record from a partial field map and return the stored read
    /// record.
    ///
    /// Only the named fields are sent; the server fills in the rest.
    pub async fn create(&self, fields: FieldMap) -> Result<R> {
        let request = Request {
            method: Method::Post,
            url: self.items_url(),
            params: self.fields_params(),
            body: Some(Value::Map(fields)),
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }

    /// Fetch one record by primary key.
    pub async fn get(&self, pk: &PK) -> Result<R> {
        let request = Request {
            method: Method::Get,
            url: self.item_url(pk),
            params: self.fields_params(),
            body: None,
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }

    /// Apply a partial field map to one record and return the updated read
    /// record.
    pub async fn update(&self, pk: &PK, fields: FieldMap) -> Result<R> {
        let request = Request {
            method: Method::Patch,
            url: self.item_url(pk),
            params: self.fields_params(),
            body: Some(Value::Map(fields)),
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }

    /// Replace one record with a full write record and return the stored
    /// read record.
    pub async fn replace(&self, pk: &PK, record: &W) -> Result<R> {
        let body = to_value(record)?;
        let request = Request {
            method: Method::Patch,
            url: self.item_url(pk),
            params: self.fields_params(),
            body: Some(body),
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }

    /// Delete one record by primary key.
    ///
    /// Expects `204 No Content`; any body the server sends anyway is
    /// discarded.
    pub async fn delete(&self, pk: &PK) -> Result<()> {
        let request = Request {
            method: Method::Delete,
            url: self.item_url(pk),
            params: BTreeMap::new(),
            body: None,
            expected_status: 204,
            token: self.client.token(),
        };
        let bytes = self.client.transport.execute(request).await?;
        if !bytes.is_empty() {
            debug!(
                collection = %self.name,
                bytes = bytes.len(),
                "discarding delete response body"
            );
        }
        Ok(())
    }

    /// List the records matching `query`.
    ///
    /// Query parameters are encoded in the client's dialect and the
    /// `fields` parameter is always attached.
    pub async fn list(&self, query: &Query) -> Result<Vec<R>> {
        let mut params = query.to_params(self.client.version);
        params.insert("fields".to_string(), field_paths_for::<R>().join(","));
        let request = Request {
            method: Method::Get,
            url: self.items_url(),
            params,
            body: None,
            expected_status: 200,
            token: self.client.token(),
        };
        self.fetch(request).await
    }
}
