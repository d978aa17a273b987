//! Field kinds and dynamically typed field storage.
//!
//! A [`FieldType`] is the declared kind of a record field; a [`FieldValue`] is
//! one stored value. The [`FieldData`] trait converts between native Rust
//! types and dynamic storage, and is what gives `set`/`scan` their typed
//! signatures without any per-type dispatch at the call site.

use alloc::{boxed::Box, string::String};
use core::fmt;

use serde::ser::{Serialize, Serializer};
use serde_json::Value as Json;

/// The declared kind of a record field.
///
/// The fixed-width primitive kinds decode by direct textual parsing of the
/// scanned span. `Optional` is a nullable wrapper around another kind. `Any`
/// holds an arbitrary JSON shape and round-trips through the general decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `true` / `false`.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// UTF-8 string.
    Str,
    /// Nullable wrapper: `null` or a value of the inner kind.
    Optional(Box<FieldType>),
    /// Any JSON value, stored as a [`serde_json::Value`].
    Any,
}

impl FieldType {
    /// The zero value a fresh or absent field of this kind takes.
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::I8 => FieldValue::I8(0),
            FieldType::I16 => FieldValue::I16(0),
            FieldType::I32 => FieldValue::I32(0),
            FieldType::I64 => FieldValue::I64(0),
            FieldType::U8 => FieldValue::U8(0),
            FieldType::U16 => FieldValue::U16(0),
            FieldType::U32 => FieldValue::U32(0),
            FieldType::U64 => FieldValue::U64(0),
            FieldType::F32 => FieldValue::F32(0.0),
            FieldType::F64 => FieldValue::F64(0.0),
            FieldType::Str => FieldValue::Str(String::new()),
            FieldType::Optional(_) => FieldValue::Null,
            FieldType::Any => FieldValue::Any(Json::Null),
        }
    }

    /// Whether a stored value is admissible for a field of this kind.
    pub(crate) fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldType::Optional(_), FieldValue::Null) => true,
            (FieldType::Optional(inner), v) => inner.accepts(v),
            (FieldType::Any, FieldValue::Any(_)) => true,
            (FieldType::Bool, FieldValue::Bool(_))
            | (FieldType::I8, FieldValue::I8(_))
            | (FieldType::I16, FieldValue::I16(_))
            | (FieldType::I32, FieldValue::I32(_))
            | (FieldType::I64, FieldValue::I64(_))
            | (FieldType::U8, FieldValue::U8(_))
            | (FieldType::U16, FieldValue::U16(_))
            | (FieldType::U32, FieldValue::U32(_))
            | (FieldType::U64, FieldValue::U64(_))
            | (FieldType::F32, FieldValue::F32(_))
            | (FieldType::F64, FieldValue::F64(_))
            | (FieldType::Str, FieldValue::Str(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::I8 => f.write_str("i8"),
            FieldType::I16 => f.write_str("i16"),
            FieldType::I32 => f.write_str("i32"),
            FieldType::I64 => f.write_str("i64"),
            FieldType::U8 => f.write_str("u8"),
            FieldType::U16 => f.write_str("u16"),
            FieldType::U32 => f.write_str("u32"),
            FieldType::U64 => f.write_str("u64"),
            FieldType::F32 => f.write_str("f32"),
            FieldType::F64 => f.write_str("f64"),
            FieldType::Str => f.write_str("string"),
            FieldType::Optional(inner) => write!(f, "Option<{inner}>"),
            FieldType::Any => f.write_str("any"),
        }
    }
}

/// One dynamically typed field value.
///
/// `Null` is the unset state of an `Optional` field; every other variant
/// corresponds 1:1 to a [`FieldType`] kind.
#[derive(Clone, PartialEq)]
pub enum FieldValue {
    /// An unset optional.
    Null,
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UTF-8 string.
    Str(String),
    /// Arbitrary JSON value.
    Any(Json),
}

impl FieldValue {
    /// The kind this value reads back as. `Null` carries no inner kind and
    /// reports as `Option<any>`.
    #[must_use]
    pub fn kind(&self) -> FieldType {
        match self {
            FieldValue::Null => FieldType::Optional(Box::new(FieldType::Any)),
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::I8(_) => FieldType::I8,
            FieldValue::I16(_) => FieldType::I16,
            FieldValue::I32(_) => FieldType::I32,
            FieldValue::I64(_) => FieldType::I64,
            FieldValue::U8(_) => FieldType::U8,
            FieldValue::U16(_) => FieldType::U16,
            FieldValue::U32(_) => FieldType::U32,
            FieldValue::U64(_) => FieldType::U64,
            FieldValue::F32(_) => FieldType::F32,
            FieldValue::F64(_) => FieldType::F64,
            FieldValue::Str(_) => FieldType::Str,
            FieldValue::Any(_) => FieldType::Any,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(v) => fmt::Debug::fmt(v, f),
            FieldValue::I8(v) => fmt::Debug::fmt(v, f),
            FieldValue::I16(v) => fmt::Debug::fmt(v, f),
            FieldValue::I32(v) => fmt::Debug::fmt(v, f),
            FieldValue::I64(v) => fmt::Debug::fmt(v, f),
            FieldValue::U8(v) => fmt::Debug::fmt(v, f),
            FieldValue::U16(v) => fmt::Debug::fmt(v, f),
            FieldValue::U32(v) => fmt::Debug::fmt(v, f),
            FieldValue::U64(v) => fmt::Debug::fmt(v, f),
            FieldValue::F32(v) => fmt::Debug::fmt(v, f),
            FieldValue::F64(v) => fmt::Debug::fmt(v, f),
            FieldValue::Str(v) => fmt::Debug::fmt(v, f),
            FieldValue::Any(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(v) => fmt::Display::fmt(v, f),
            FieldValue::I8(v) => fmt::Display::fmt(v, f),
            FieldValue::I16(v) => fmt::Display::fmt(v, f),
            FieldValue::I32(v) => fmt::Display::fmt(v, f),
            FieldValue::I64(v) => fmt::Display::fmt(v, f),
            FieldValue::U8(v) => fmt::Display::fmt(v, f),
            FieldValue::U16(v) => fmt::Display::fmt(v, f),
            FieldValue::U32(v) => fmt::Display::fmt(v, f),
            FieldValue::U64(v) => fmt::Display::fmt(v, f),
            FieldValue::F32(v) => fmt::Display::fmt(v, f),
            FieldValue::F64(v) => fmt::Display::fmt(v, f),
            FieldValue::Str(v) => fmt::Display::fmt(v, f),
            FieldValue::Any(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::I8(v) => serializer.serialize_i8(*v),
            FieldValue::I16(v) => serializer.serialize_i16(*v),
            FieldValue::I32(v) => serializer.serialize_i32(*v),
            FieldValue::I64(v) => serializer.serialize_i64(*v),
            FieldValue::U8(v) => serializer.serialize_u8(*v),
            FieldValue::U16(v) => serializer.serialize_u16(*v),
            FieldValue::U32(v) => serializer.serialize_u32(*v),
            FieldValue::U64(v) => serializer.serialize_u64(*v),
            FieldValue::F32(v) => serializer.serialize_f32(*v),
            FieldValue::F64(v) => serializer.serialize_f64(*v),
            FieldValue::Str(v) => serializer.serialize_str(v),
            FieldValue::Any(v) => v.serialize(serializer),
        }
    }
}

/// Conversion between native Rust types and dynamic field storage.
///
/// Implemented for the primitive kinds, `String`, `Option<T>` (nullable
/// fields), and [`serde_json::Value`] (`Any` fields).
pub trait FieldData: Sized {
    /// The field kind this type maps to.
    fn kind() -> FieldType;
    /// Wraps the value in dynamic storage.
    fn into_field(self) -> FieldValue;
    /// Unwraps dynamic storage; `None` when the stored kind differs.
    fn from_field(value: &FieldValue) -> Option<Self>;
}

macro_rules! primitive_field_data {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl FieldData for $ty {
            fn kind() -> FieldType {
                FieldType::$kind
            }

            fn into_field(self) -> FieldValue {
                FieldValue::$kind(self)
            }

            fn from_field(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$kind(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    )*};
}

primitive_field_data! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Json => Any,
}

impl<T: FieldData> FieldData for Option<T> {
    fn kind() -> FieldType {
        FieldType::Optional(Box::new(T::kind()))
    }

    fn into_field(self) -> FieldValue {
        match self {
            Some(v) => v.into_field(),
            None => FieldValue::Null,
        }
    }

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            v => T::from_field(v).map(Some),
        }
    }
}
