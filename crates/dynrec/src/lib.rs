//! Runtime-defined record types backed by a single-pass JSON field scanner.
//!
//! A [`RecordType`] is defined at runtime from named, kinded fields; a
//! [`RecordValue`] stores one value per field with checked typed accessors.
//! JSON decoding does not build a parse tree: [`scan`] runs a table-driven
//! lexer over the document once, hands back the raw byte span of every
//! top-level member, and each field decodes its own span by kind.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod define;
mod error;
mod field;
mod json;
mod record;
mod scanner;
mod value;

#[cfg(test)]
mod tests;

pub use define::RecordBuilder;
pub use error::{DecodeError, DefineError, FieldError, ScanError};
pub use field::{FieldData, FieldType, FieldValue};
pub use record::RecordType;
pub use scanner::{Kv, scan};
pub use value::RecordValue;
