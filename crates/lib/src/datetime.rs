//! Date/time values in the CMS wire format.
//!
//! The server exchanges timestamps as `YYYY-MM-DD HH:MM:SS` strings without a
//! timezone. [`DateTime`] wraps [`chrono::NaiveDateTime`] and pins that format
//! for parsing, display and serde.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// Format string shared by parsing and encoding.
const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A timestamp in the server's `YYYY-MM-DD HH:MM:SS` wire format.
///
/// Serializes to and from the wire string; field-path enumeration treats it
/// as an opaque leaf rather than expanding its inner representation.
///
/// # Example
///
/// ```
/// # use directus_client::DateTime;
/// let dt: DateTime = "2021-03-04 05:06:07".parse().unwrap();
/// assert_eq!(dt.to_string(), "2021-03-04 05:06:07");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(NaiveDateTime);

impl DateTime {
    /// Wrap a naive timestamp.
    pub fn new(inner: NaiveDateTime) -> Self {
        DateTime(inner)
    }

    /// The current time in UTC.
    pub fn now() -> Self {
        DateTime(chrono::Utc::now().naive_utc())
    }

    /// The wrapped naive timestamp.
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for DateTime {
    type Err = chrono::format::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, WIRE_FORMAT).map(DateTime)
    }
}

impl From<NaiveDateTime> for DateTime {
    fn from(value: NaiveDateTime) -> Self {
        DateTime(value)
    }
}

impl From<DateTime> for NaiveDateTime {
    fn from(value: DateTime) -> Self {
        value.0
    }
}

impl From<chrono::DateTime<chrono::Utc>> for DateTime {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        DateTime(value.naive_utc())
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Value::Text(value.to_string())
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
