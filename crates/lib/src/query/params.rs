//! Dialect encoding of query specifications.
//!
//! Two addressing dialects exist. [`ApiVersion::V8`] spells operators bare
//! (`filter[field][op]`), encodes the not-null predicate as an empty string
//! and never injects a limit. [`ApiVersion::V9`] prefixes operators with an
//! underscore, spells not-null as `"true"`, injects `limit=-1` when no
//! explicit limit is set, and encodes deep directives by splitting the dotted
//! relation path into successive bracketed segments.
//!
//! Output is a `BTreeMap`, so parameters are handed to the transport in
//! sorted key order.

use std::collections::BTreeMap;
use std::fmt;

use super::{FilterValue, Query};

/// Selects the wire dialect for query parameter encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Legacy dialect: bare operator names, no implicit limit, no deep
    /// directives.
    V8,
    /// Current dialect: underscore-prefixed operators, implicit unbounded
    /// limit, deep directive support.
    V9,
}

impl ApiVersion {
    /// The version name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V8 => "v8",
            ApiVersion::V9 => "v9",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Query {
    /// Encode the query as a flat parameter map in the given dialect.
    ///
    /// Filter directives become `filter[field][op]` (V8) or
    /// `filter[field][_op]` (V9) keys. Sort keys join with commas, descending
    /// keys spelled `-field`. V9 injects `limit=-1` when the query has no
    /// explicit limit and additionally encodes deep directives; V8 ignores
    /// them. The captured search string has no wire encoding in either
    /// dialect.
    pub fn to_params(&self, version: ApiVersion) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        for ((field, op), value) in &self.filters {
            let key = match version {
                ApiVersion::V8 => format!("filter[{field}][{}]", op.name()),
                ApiVersion::V9 => format!("filter[{field}][_{}]", op.name()),
            };
            params.insert(key, encode_value(value, version));
        }

        if !self.sort.is_empty() {
            params.insert("sort".to_string(), self.sort.join(","));
        }

        match (self.limit, version) {
            (Some(limit), _) => {
                params.insert("limit".to_string(), limit.to_string());
            }
            // The newer dialect paginates by default; ask for everything
            // unless the caller set a limit.
            (None, ApiVersion::V9) => {
                params.insert("limit".to_string(), "-1".to_string());
            }
            (None, ApiVersion::V8) => {}
        }

        if let Some(offset) = self.offset {
            params.insert("offset".to_string(), offset.to_string());
        }

        if version == ApiVersion::V9 {
            for ((path, op), value) in &self.deep_filters {
                let key = format!("{}[_{}]", deep_key(path), op.name());
                params.insert(key, encode_value(value, version));
            }
            for (path, limit) in &self.deep_limits {
                params.insert(format!("{}[_limit]", deep_key(path)), limit.to_string());
            }
            for (path, offset) in &self.deep_offsets {
                params.insert(format!("{}[_offset]", deep_key(path)), offset.to_string());
            }
        }

        params
    }
}

/// Splits a dotted relation path into successive bracketed segments.
fn deep_key(path: &str) -> String {
    let mut key = String::from("deep");
    for segment in path.split('.') {
        key.push('[');
        key.push_str(segment);
        key.push(']');
    }
    key
}

fn encode_value(value: &FilterValue, version: ApiVersion) -> String {
    match value {
        FilterValue::Text(v) => v.clone(),
        FilterValue::List(vs) => vs.join(","),
        FilterValue::NotNull => match version {
            ApiVersion::V8 => String::new(),
            ApiVersion::V9 => "true".to_string(),
        },
    }
}
