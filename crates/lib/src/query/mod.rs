//! List query specifications.
//!
//! This module provides the immutable [`Query`] builder holding filter, sort,
//! pagination and search directives, plus a parallel "deep" directive set
//! addressed by dotted relation paths for filtering related sub-collections.
//! Encoding into wire parameters lives in [`params`] and is selected by
//! [`ApiVersion`].
//!
//! Every mutator consumes the query and returns the updated value, so two
//! queries never share backing storage and refining a clone leaves the
//! original untouched.

use std::collections::BTreeMap;

mod params;

pub use params::ApiVersion;

/// Filter operators shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Operator {
    Eq,
    Neq,
    In,
    NotNull,
}

impl Operator {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::In => "in",
            Operator::NotNull => "nnull",
        }
    }
}

/// The right-hand side of a filter directive.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FilterValue {
    /// Single comparison value.
    Text(String),
    /// Membership list, comma-joined at encode time.
    List(Vec<String>),
    /// Not-null predicate; the value is decided by the dialect.
    NotNull,
}

/// An immutable set of filter/sort/pagination/search directives.
///
/// The empty query is the valid starting point and every mutator returns a
/// new value. Filters on the same field and operator overwrite (map
/// semantics); sort keys accumulate in call order.
///
/// # Example
///
/// ```
/// # use directus_client::{ApiVersion, Query};
/// let query = Query::none()
///     .eq("status", "published")
///     .sort_asc("name")
///     .limit(10);
///
/// let params = query.to_params(ApiVersion::V9);
/// assert_eq!(params["filter[status][_eq]"], "published");
/// assert_eq!(params["sort"], "name");
/// assert_eq!(params["limit"], "10");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: BTreeMap<(String, Operator), FilterValue>,
    sort: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    search: Option<String>,
    deep_filters: BTreeMap<(String, Operator), FilterValue>,
    deep_limits: BTreeMap<String, i64>,
    deep_offsets: BTreeMap<String, i64>,
}

impl Query {
    /// The empty query; same as `Default`.
    pub fn none() -> Self {
        Self::default()
    }

    /// Keep records whose `field` equals `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(
            (field.into(), Operator::Eq),
            FilterValue::Text(value.to_string()),
        );
        self
    }

    /// Keep records whose `field` differs from `value`.
    pub fn neq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(
            (field.into(), Operator::Neq),
            FilterValue::Text(value.to_string()),
        );
        self
    }

    /// Keep records whose `field` is one of `values`.
    pub fn any_of(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl ToString>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.filters
            .insert((field.into(), Operator::In), FilterValue::List(values));
        self
    }

    /// Keep records whose `field` is not null.
    pub fn not_null(mut self, field: impl Into<String>) -> Self {
        self.filters
            .insert((field.into(), Operator::NotNull), FilterValue::NotNull);
        self
    }

    /// Sort ascending by `field`. Sort keys accumulate in call order.
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(field.into());
        self
    }

    /// Sort descending by `field`. Sort keys accumulate in call order.
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(format!("-{}", field.into()));
        self
    }

    /// Return at most `limit` records.
    ///
    /// Without an explicit limit the newer dialect asks for an unbounded
    /// listing, see [`Query::to_params`].
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `offset` records.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Free-text search string.
    ///
    /// Captured on the query but not emitted by either dialect; reserved as
    /// an extension point.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }

    /// Keep related records whose field at the dotted `path` equals `value`.
    ///
    /// Deep directives only encode under the newer dialect.
    pub fn deep_eq(mut self, path: impl Into<String>, value: impl ToString) -> Self {
        self.deep_filters.insert(
            (path.into(), Operator::Eq),
            FilterValue::Text(value.to_string()),
        );
        self
    }

    /// Keep related records whose field at the dotted `path` differs from
    /// `value`.
    pub fn deep_neq(mut self, path: impl Into<String>, value: impl ToString) -> Self {
        self.deep_filters.insert(
            (path.into(), Operator::Neq),
            FilterValue::Text(value.to_string()),
        );
        self
    }

    /// Keep related records whose field at the dotted `path` is one of
    /// `values`.
    pub fn deep_any_of(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = impl ToString>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.deep_filters
            .insert((path.into(), Operator::In), FilterValue::List(values));
        self
    }

    /// Keep related records whose field at the dotted `path` is not null.
    pub fn deep_not_null(mut self, path: impl Into<String>) -> Self {
        self.deep_filters
            .insert((path.into(), Operator::NotNull), FilterValue::NotNull);
        self
    }

    /// Limit the related records returned for the relation at `path`.
    pub fn deep_limit(mut self, path: impl Into<String>, limit: i64) -> Self {
        self.deep_limits.insert(path.into(), limit);
        self
    }

    /// Skip leading related records for the relation at `path`.
    pub fn deep_offset(mut self, path: impl Into<String>, offset: i64) -> Self {
        self.deep_offsets.insert(path.into(), offset);
        self
    }
}
