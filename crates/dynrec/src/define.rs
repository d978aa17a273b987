//! Builder for [`RecordType`] definitions.

use alloc::{
    collections::BTreeMap,
    string::ToString,
    sync::Arc,
    vec::Vec,
};

use crate::{
    error::DefineError,
    field::FieldType,
    record::{Field, RecordType},
};

/// Builds a [`RecordType`] field by field.
///
/// Validation errors are latched: the first invalid or repeated name poisons
/// the builder and is reported by [`finish`](Self::finish), so call sites can
/// chain without checking each step. Consuming `self` makes reuse after
/// `finish` impossible by construction.
#[derive(Debug)]
pub struct RecordBuilder {
    record: RecordType,
    err: Option<DefineError>,
}

impl RecordBuilder {
    pub(crate) fn new(name: &str) -> Self {
        let err = (!is_valid_ident(name)).then(|| DefineError::InvalidName {
            kind: "type",
            name: name.to_string(),
        });
        Self {
            record: RecordType {
                name: name.to_string(),
                fields: Vec::new(),
                index: BTreeMap::new(),
            },
            err,
        }
    }

    /// Adds a field with the given name and kind.
    #[must_use]
    pub fn field(mut self, name: &str, ty: FieldType) -> Self {
        if self.err.is_some() {
            return self;
        }
        if !is_valid_ident(name) {
            self.err = Some(DefineError::InvalidName {
                kind: "field",
                name: name.to_string(),
            });
            return self;
        }
        if self.record.index.contains_key(name) {
            self.err = Some(DefineError::RepeatedField {
                name: name.to_string(),
            });
            return self;
        }
        self.record
            .index
            .insert(name.to_string(), self.record.fields.len());
        self.record.fields.push(Field {
            name: name.to_string(),
            ty,
        });
        self
    }

    /// Finishes the definition, reporting the first latched error if any.
    pub fn finish(self) -> Result<Arc<RecordType>, DefineError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(Arc::new(self.record)),
        }
    }
}

/// ASCII identifier check: non-empty, does not start with a digit, and every
/// byte is a letter, digit, or underscore.
fn is_valid_ident(ident: &str) -> bool {
    let bytes = ident.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }
    bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}
