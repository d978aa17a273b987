//! Runtime-defined record types.

use alloc::{
    collections::BTreeMap,
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::fmt;

use crate::{
    define::RecordBuilder,
    error::FieldError,
    field::{FieldType, FieldValue},
    value::RecordValue,
};

/// One declared field: its name and kind, in definition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    pub(crate) name: String,
    pub(crate) ty: FieldType,
}

/// A record type defined at runtime: an ordered list of named, kinded fields.
///
/// Immutable once built; shared between its values via `Arc`.
///
/// ```
/// use dynrec::{FieldType, RecordType};
///
/// let ty = RecordType::define("Point")
///     .field("x", FieldType::I32)
///     .field("y", FieldType::I32)
///     .finish()?;
/// let point = ty.new_value();
/// assert_eq!(point.scan::<i32>("x")?, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) index: BTreeMap<String, usize>,
}

impl RecordType {
    /// Starts defining a record type with the given name.
    #[must_use]
    pub fn define(name: &str) -> RecordBuilder {
        RecordBuilder::new(name)
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the type declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The declared kind of a field, or `None` for an unknown name.
    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<&FieldType> {
        self.index.get(field).map(|&i| &self.fields[i].ty)
    }

    /// Iterates `(name, kind)` pairs in definition order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.ty))
    }

    /// Creates a value of this type with every field at its zero value.
    #[must_use]
    pub fn new_value(self: &Arc<Self>) -> RecordValue {
        RecordValue::zeroed(Arc::clone(self))
    }

    /// Creates a value from `(name, value)` entries, ignoring entries whose
    /// name matches no declared field.
    ///
    /// Fields without an entry keep their zero value. An entry whose kind does
    /// not match the declared field is still an error.
    pub fn value_from_map<'a>(
        self: &Arc<Self>,
        entries: impl IntoIterator<Item = (&'a str, FieldValue)>,
    ) -> Result<RecordValue, FieldError> {
        let mut value = self.new_value();
        for (field, entry) in entries {
            if self.field_index(field).is_some() {
                value.set_value(field, entry)?;
            }
        }
        Ok(value)
    }

    /// Creates a value from `(name, value)` entries, rejecting entries whose
    /// name matches no declared field.
    pub fn value_from_map_strict<'a>(
        self: &Arc<Self>,
        entries: impl IntoIterator<Item = (&'a str, FieldValue)>,
    ) -> Result<RecordValue, FieldError> {
        let mut value = self.new_value();
        for (field, entry) in entries {
            value.set_value(field, entry)?;
        }
        Ok(value)
    }

    pub(crate) fn field_index(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
