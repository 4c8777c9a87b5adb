//! Tri-state optional values for partial updates.
//!
//! This module provides the [`Tristate`] wrapper that distinguishes a field
//! that was never touched from one explicitly cleared and one explicitly set.
//! Plain `Option` collapses the first two, which is not enough for partial
//! update payloads where "send null" and "leave alone" are different intents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A field value distinguishing "never touched", "explicitly cleared" and
/// "explicitly set".
///
/// Write records wrap nullable fields in `Tristate` instead of `Option`.
/// Constructed once per write operation and consumed during serialization.
///
/// # Wire encoding
///
/// `Set(v)` encodes the held value. `Cleared` **and** `Untouched` both encode
/// the null literal: the wire format has no per-field omission mechanism, so
/// an untouched field produces the same bytes as an explicitly cleared one.
/// This collapse is intentional and callers should not rely on `Untouched`
/// meaning "absent from the payload".
///
/// Decoding is where the three states separate: null decodes to `Cleared`, a
/// value decodes to `Set`, and a field absent from the payload leaves the
/// wrapper at its `Untouched` default. Read records must annotate `Tristate`
/// fields with `#[serde(default)]` for the absent case to work.
///
/// Wrapping a `Tristate` in another `Tristate` makes the state ambiguous and
/// is rejected when a record schema is built, see
/// [`FieldKind::tristate`](crate::schema::FieldKind::tristate).
///
/// # Example
///
/// ```
/// # use directus_client::Tristate;
/// let set = Tristate::set(5);
/// assert!(set.is_set());
/// assert_eq!(set.value_or_default(), 5);
///
/// let cleared: Tristate<i32> = Tristate::cleared();
/// assert!(!cleared.is_set());
/// assert_eq!(cleared.value_or_default(), 0);
///
/// let untouched = Tristate::<i32>::default();
/// assert!(untouched.is_untouched());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tristate<T> {
    /// Never touched; the default state.
    #[default]
    Untouched,
    /// Explicitly cleared; encodes as null.
    Cleared,
    /// Explicitly set to a value.
    Set(T),
}

impl<T> Tristate<T> {
    /// Create a wrapper holding a value.
    pub fn set(value: T) -> Self {
        Tristate::Set(value)
    }

    /// Create an explicitly cleared wrapper.
    pub fn cleared() -> Self {
        Tristate::Cleared
    }

    /// Create an untouched wrapper; same as `Default`.
    pub fn untouched() -> Self {
        Tristate::Untouched
    }

    /// Returns true iff a value is set.
    pub fn is_set(&self) -> bool {
        matches!(self, Tristate::Set(_))
    }

    /// Returns true if the field was explicitly cleared.
    pub fn is_cleared(&self) -> bool {
        matches!(self, Tristate::Cleared)
    }

    /// Returns true if the field was never touched.
    pub fn is_untouched(&self) -> bool {
        matches!(self, Tristate::Untouched)
    }

    /// Returns the state name as a string.
    pub fn state_name(&self) -> &'static str {
        match self {
            Tristate::Untouched => "untouched",
            Tristate::Cleared => "cleared",
            Tristate::Set(_) => "set",
        }
    }

    /// Borrow the held value, failing fast if no value is set.
    pub fn value(&self) -> Result<&T, TristateError> {
        match self {
            Tristate::Set(v) => Ok(v),
            other => Err(TristateError::NotSet {
                state: other.state_name().to_string(),
            }),
        }
    }

    /// Consume the wrapper and return the held value, failing fast if no
    /// value is set.
    pub fn into_value(self) -> Result<T, TristateError> {
        match self {
            Tristate::Set(v) => Ok(v),
            other => Err(TristateError::NotSet {
                state: other.state_name().to_string(),
            }),
        }
    }

    /// Returns the held value if set, else the type's default. Never fails.
    pub fn value_or_default(&self) -> T
    where
        T: Default + Clone,
    {
        match self {
            Tristate::Set(v) => v.clone(),
            _ => T::default(),
        }
    }

    /// Borrow the held value as an `Option`, collapsing the two valueless
    /// states to `None`.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Tristate::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Consume the wrapper into an `Option`, collapsing the two valueless
    /// states to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Tristate::Set(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for Tristate<T> {
    fn from(value: T) -> Self {
        Tristate::Set(value)
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Tristate::Set(v) => v.serialize(serializer),
            // Both valueless states hit the wire as null. The unit kind is
            // used rather than none so the ordered encoder can tell a
            // tri-state null apart from an Option field.
            Tristate::Cleared | Tristate::Untouched => serializer.serialize_unit(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Null decodes to Cleared, a value to Set. An absent field never
        // reaches this point; #[serde(default)] on the containing record
        // leaves it Untouched.
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Tristate::Set(v),
            None => Tristate::Cleared,
        })
    }
}

/// Structured error types for tri-state access.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TristateError {
    /// The fail-fast accessor was called on a wrapper holding no value.
    #[error("no value set: tri-state field is {state}")]
    NotSet { state: String },
}

impl TristateError {
    /// Check if this error reports an unset value.
    pub fn is_not_set(&self) -> bool {
        matches!(self, TristateError::NotSet { .. })
    }
}

// Conversion from TristateError to the main Error type
impl From<TristateError> for crate::Error {
    fn from(err: TristateError) -> Self {
        crate::Error::Tristate(err)
    }
}
