//! Field-path enumeration.
//!
//! Walks a record schema depth-first and produces the flattened list of
//! dot-separated leaf paths sent as the `fields` query parameter. Paths for a
//! given record type are computed once per process and cached by type
//! identity, so two collections over different record types never see each
//! other's paths.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use super::{FieldKind, Model, Schema};

/// Cached path lists keyed by record type.
///
/// The mutex stays held across first population, so parallel callers racing
/// on the same type compute its paths exactly once.
static PATH_CACHE: LazyLock<Mutex<HashMap<TypeId, Arc<[String]>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Leaf field paths for a record type, cached per type.
///
/// The first call for a type computes its paths from [`Model::schema`]; later
/// calls return the same shared list. Distinct record types get distinct
/// cached lists.
pub fn field_paths_for<R: Model + 'static>() -> Arc<[String]> {
    let mut cache = PATH_CACHE.lock().unwrap();
    cache
        .entry(TypeId::of::<R>())
        .or_insert_with(|| Arc::from(field_paths(&R::schema())))
        .clone()
}

/// Flattens a schema into dot-separated leaf paths, depth-first in
/// declaration order.
///
/// Nested records recurse with a `parent.` prefix. A tri-state wrapper is
/// transparent when it wraps a record and an opaque leaf otherwise, so
/// `Tristate<DateTime>` contributes its own path rather than the timestamp's
/// internals. Maps and lists are opaque leaves.
pub fn field_paths(schema: &Schema) -> Vec<String> {
    let mut paths = Vec::new();
    walk(schema, None, &mut paths);
    paths
}

fn walk(schema: &Schema, prefix: Option<&str>, paths: &mut Vec<String>) {
    for field in schema.fields() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{}", field.name()),
            None => field.name().to_string(),
        };
        match field.kind() {
            FieldKind::Record(nested) => walk(nested, Some(&path), paths),
            FieldKind::Tristate(inner) => match inner.as_ref() {
                FieldKind::Record(nested) => walk(nested, Some(&path), paths),
                // Normally rejected by FieldKind::tristate; a hand-built
                // variant still fails fast here.
                FieldKind::Tristate(_) => panic!("nested tri-state wrapper at `{path}`"),
                _ => paths.push(path),
            },
            _ => paths.push(path),
        }
    }
}
