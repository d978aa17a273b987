//! Record values: per-field dynamic storage behind a shared type.

use alloc::{string::ToString, sync::Arc, vec::Vec};
use core::fmt;

use crate::{
    error::FieldError,
    field::{FieldData, FieldValue},
    record::RecordType,
};

/// A value of a runtime-defined [`RecordType`].
///
/// Storage is one [`FieldValue`] slot per declared field, in definition
/// order. All accessors are checked: an unknown field name or a kind mismatch
/// is an error, never a silent coercion.
///
/// ```
/// use dynrec::{FieldType, RecordType};
///
/// let ty = RecordType::define("Abc")
///     .field("int8", FieldType::I8)
///     .field("pint", FieldType::Optional(Box::new(FieldType::I64)))
///     .field("str", FieldType::Str)
///     .finish()?;
///
/// let mut val = ty.new_value();
/// val.set("int8", 123i8)?;
/// val.set("pint", Some(456i64))?;
/// val.set("str", String::from("789"))?;
///
/// assert_eq!(val.scan::<i8>("int8")?, 123);
/// assert_eq!(val.scan::<Option<i64>>("pint")?, Some(456));
/// assert!(val.scan::<i64>("int8").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct RecordValue {
    ty: Arc<RecordType>,
    values: Vec<FieldValue>,
}

impl RecordValue {
    pub(crate) fn zeroed(ty: Arc<RecordType>) -> Self {
        let values = ty.fields.iter().map(|f| f.ty.zero_value()).collect();
        Self { ty, values }
    }

    /// The type this value belongs to.
    #[must_use]
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    /// Sets a field from a native value, checking name and kind.
    ///
    /// A non-optional slot rejects `None`; an `Optional` slot accepts both the
    /// bare inner type and `Option` of it.
    pub fn set<T: FieldData>(&mut self, field: &str, value: T) -> Result<(), FieldError> {
        let slot = self.slot_index(field)?;
        let stored = value.into_field();
        if !self.ty.fields[slot].ty.accepts(&stored) {
            return Err(self.mismatch(slot, field, T::kind()));
        }
        self.values[slot] = stored;
        Ok(())
    }

    /// Sets a field from already-dynamic storage, checking name and kind.
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let slot = self.slot_index(field)?;
        if !self.ty.fields[slot].ty.accepts(&value) {
            return Err(self.mismatch(slot, field, value.kind()));
        }
        self.values[slot] = value;
        Ok(())
    }

    /// Borrows a field's dynamic storage.
    pub fn get(&self, field: &str) -> Result<&FieldValue, FieldError> {
        let slot = self.slot_index(field)?;
        Ok(&self.values[slot])
    }

    /// Reads a field back as a native value, checking name and kind.
    ///
    /// The requested type must match the declared kind exactly: scanning a
    /// bare `i64` out of an `Optional` i64 field is a mismatch, as is any
    /// width change.
    pub fn scan<T: FieldData>(&self, field: &str) -> Result<T, FieldError> {
        let slot = self.slot_index(field)?;
        if self.ty.fields[slot].ty != T::kind() {
            return Err(self.mismatch(slot, field, T::kind()));
        }
        T::from_field(&self.values[slot]).ok_or_else(|| self.mismatch(slot, field, T::kind()))
    }

    /// Resets every field to its kind's zero value.
    pub fn clear(&mut self) {
        for (slot, field) in self.ty.fields.iter().enumerate() {
            self.values[slot] = field.ty.zero_value();
        }
    }

    /// Iterates `(name, value)` pairs in definition order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.ty
            .fields
            .iter()
            .zip(&self.values)
            .map(|(f, v)| (f.name.as_str(), v))
    }

    pub(crate) fn set_slot(&mut self, slot: usize, value: FieldValue) {
        self.values[slot] = value;
    }

    fn slot_index(&self, field: &str) -> Result<usize, FieldError> {
        self.ty
            .field_index(field)
            .ok_or_else(|| FieldError::MissingField {
                record: self.ty.name.clone(),
                field: field.to_string(),
            })
    }

    fn mismatch(&self, slot: usize, field: &str, got: crate::FieldType) -> FieldError {
        FieldError::TypeMismatch {
            record: self.ty.name.clone(),
            field: field.to_string(),
            expected: self.ty.fields[slot].ty.clone(),
            got,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (_, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.ty.name);
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}
