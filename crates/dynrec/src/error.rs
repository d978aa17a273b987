//! Error types for scanning, type definition, field access, and decoding.

use alloc::string::String;

use thiserror::Error;

use crate::field::FieldType;

/// Scan failure.
///
/// Every scanner-level failure — an illegal control byte, a class not
/// permitted in the current state, a bracket-discipline violation, or
/// truncated input — collapses into this one positionless value. A failing
/// scan produces no pairs and is not recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid json")]
pub struct ScanError;

/// Errors reported while defining a [`crate::RecordType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefineError {
    /// The type or field name is not a valid identifier.
    #[error("invalid {kind} name: {name:?}")]
    InvalidName {
        /// `"type"` or `"field"`.
        kind: &'static str,
        /// The rejected name.
        name: String,
    },
    /// A field with this name was already added.
    #[error("repeated field name: {name:?}")]
    RepeatedField {
        /// The duplicated field name.
        name: String,
    },
}

/// Errors reported by the typed accessors of [`crate::RecordValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The record type has no field with this name.
    #[error("type {record:?} missing field {field:?}")]
    MissingField {
        /// Record type name.
        record: String,
        /// Requested field name.
        field: String,
    },
    /// The declared field kind does not match the supplied or requested type.
    #[error("field {field:?} of type {record:?} unmatched type: expected {expected}, got {got}")]
    TypeMismatch {
        /// Record type name.
        record: String,
        /// Field name.
        field: String,
        /// The declared kind of the field.
        expected: FieldType,
        /// The kind of the value supplied or requested.
        got: FieldType,
    },
}

/// Errors reported while decoding a JSON document into a record value.
///
/// Unlike [`ScanError`], decode errors name the record type, the field, and
/// its declared kind: they are layered above the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The document is not syntactically well-formed.
    #[error(transparent)]
    Syntax(#[from] ScanError),
    /// A member's raw bytes could not be decoded as the field's kind.
    #[error("field {field:?} of type {record:?}: invalid value for {expected}")]
    Field {
        /// Record type name.
        record: String,
        /// Field name.
        field: String,
        /// The declared kind of the field.
        expected: FieldType,
    },
}
