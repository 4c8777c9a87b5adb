//! Record shape descriptors.
//!
//! This module provides the [`Schema`] descriptor that lists a record's wire
//! fields in declaration order, the [`FieldKind`] dispatch enum, and the
//! [`Model`] trait connecting a record type to its schema. Schemas drive the
//! field-path enumerator in [`paths`], which computes the `fields` query
//! parameter sent with every read operation.
//!
//! A schema is built once at registration time and violating its invariants
//! (duplicate wire names, nested tri-state wrappers) fails fast.

mod paths;

pub use paths::{field_paths, field_paths_for};

/// Describes a record type's wire shape.
///
/// Read record types implement `Model` so the client can enumerate their
/// leaf field paths. The schema must list fields in the same order as the
/// record declares them, with the same wire names the record's serde
/// attributes produce.
///
/// # Example
///
/// ```
/// # use directus_client::schema::{FieldKind, Model, Schema};
/// struct Plant;
///
/// impl Model for Plant {
///     fn schema() -> Schema {
///         Schema::new()
///             .field("id", FieldKind::Int)
///             .field("name", FieldKind::Text)
///     }
/// }
///
/// assert_eq!(Plant::schema().len(), 2);
/// ```
pub trait Model {
    /// The record's field descriptors in declaration order.
    fn schema() -> Schema;
}

/// An ordered list of field descriptors for one record type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, consuming and returning the schema for chaining.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same wire name is already present. Wire
    /// names must be unique among siblings.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        assert!(
            !self.fields.iter().any(|f| f.name == name),
            "duplicate field name `{name}` in schema"
        );
        self.fields.push(FieldDef { name, kind });
        self
    }

    /// The field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single field descriptor: wire name plus kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
}

impl FieldDef {
    /// The field's wire name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// The kind of a record field, deciding leaf-vs-nested dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Boolean leaf.
    Bool,
    /// Signed integer leaf.
    Int,
    /// Unsigned integer leaf.
    Uint,
    /// Floating point leaf.
    Float,
    /// Text leaf.
    Text,
    /// Date/time leaf in the wire format.
    DateTime,
    /// Sequence of elements; an opaque leaf for path purposes.
    List(Box<FieldKind>),
    /// String-keyed map, treated as an opaque leaf.
    Map,
    /// Nested record with its own schema.
    Record(Schema),
    /// Tri-state wrapper around another kind.
    Tristate(Box<FieldKind>),
}

impl FieldKind {
    /// A sequence of `element` values.
    pub fn list(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    /// A nested record.
    pub fn record(schema: Schema) -> Self {
        FieldKind::Record(schema)
    }

    /// A tri-state wrapper around `inner`.
    ///
    /// # Panics
    ///
    /// Panics if `inner` is already a tri-state wrapper. Double wrapping
    /// makes the field state ambiguous and is rejected when the schema is
    /// built.
    pub fn tristate(inner: FieldKind) -> Self {
        assert!(
            !matches!(inner, FieldKind::Tristate(_)),
            "tri-state wrappers cannot be nested"
        );
        FieldKind::Tristate(Box::new(inner))
    }
}
