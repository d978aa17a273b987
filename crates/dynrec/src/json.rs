//! JSON encode and scan-driven decode for record values.
//!
//! Encoding walks the fields in definition order through a hand-written
//! [`Serialize`] impl, so output member order always matches the definition.
//!
//! Decoding never builds a tree for the document itself: [`scan`] yields the
//! raw byte span of each top-level member, and each declared field decodes its
//! span by kind. Fixed-width primitives parse their text directly, unescaped
//! strings just drop the surrounding quotes, and only escaped strings and
//! `Any` shapes fall back to the general `serde_json` decoder.

use alloc::{string::String, sync::Arc};
use core::str::FromStr;

use bstr::ByteSlice;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

use crate::{
    error::DecodeError,
    field::{FieldType, FieldValue},
    scanner::scan,
    value::RecordValue,
};

impl Serialize for RecordValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record_type().len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl RecordValue {
    /// Encodes the record as a compact JSON object, members in field
    /// definition order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a JSON object into this record.
    ///
    /// Every declared field is overwritten: present members decode by kind,
    /// absent ones reset to the kind's zero value. Members whose key matches
    /// no declared field are ignored. A syntax error leaves the record
    /// untouched; a per-field decode error aborts mid-update, so treat a
    /// failed decode as poisoning the value.
    ///
    /// ```
    /// use dynrec::{FieldType, RecordType};
    ///
    /// let ty = RecordType::define("Abc")
    ///     .field("int", FieldType::I64)
    ///     .field("str", FieldType::Str)
    ///     .finish()?;
    /// let mut val = ty.new_value();
    /// val.merge_json(br#"{"int":123,"str":"789","extra":[1,2]}"#)?;
    /// assert_eq!(val.scan::<i64>("int")?, 123);
    /// assert_eq!(val.scan::<String>("str")?, "789");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge_json(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let kvs = scan(data)?;
        let ty = Arc::clone(self.record_type());
        for (slot, (name, kind)) in ty.fields().enumerate() {
            let raw = kvs
                .iter()
                .find(|kv| &*kv.key == name)
                .map(|kv| kv.value);
            let value = match raw {
                None => kind.zero_value(),
                Some(raw) => {
                    decode_field(kind, raw).ok_or_else(|| DecodeError::Field {
                        record: ty.name().into(),
                        field: name.into(),
                        expected: kind.clone(),
                    })?
                }
            };
            self.set_slot(slot, value);
        }
        Ok(())
    }
}

/// Decodes one raw member span as the given kind. `None` means the span's
/// shape does not fit the kind.
fn decode_field(kind: &FieldType, raw: &[u8]) -> Option<FieldValue> {
    match kind {
        FieldType::Bool => match raw {
            b"true" => Some(FieldValue::Bool(true)),
            b"false" => Some(FieldValue::Bool(false)),
            _ => None,
        },
        FieldType::I8 => parse_text(raw).map(FieldValue::I8),
        FieldType::I16 => parse_text(raw).map(FieldValue::I16),
        FieldType::I32 => parse_text(raw).map(FieldValue::I32),
        FieldType::I64 => parse_text(raw).map(FieldValue::I64),
        FieldType::U8 => parse_text(raw).map(FieldValue::U8),
        FieldType::U16 => parse_text(raw).map(FieldValue::U16),
        FieldType::U32 => parse_text(raw).map(FieldValue::U32),
        FieldType::U64 => parse_text(raw).map(FieldValue::U64),
        FieldType::F32 => parse_text(raw).map(FieldValue::F32),
        FieldType::F64 => parse_text(raw).map(FieldValue::F64),
        FieldType::Str => decode_string(raw).map(FieldValue::Str),
        FieldType::Optional(inner) => {
            if raw == b"null" {
                Some(FieldValue::Null)
            } else {
                decode_field(inner, raw)
            }
        }
        FieldType::Any => serde_json::from_slice::<Json>(raw).ok().map(FieldValue::Any),
    }
}

/// Direct textual parse of a numeric span. The scanner already validated the
/// numeral's grammar; this only rejects range overflow and shape mismatches
/// (e.g. a fraction decoding into an integer field).
fn parse_text<T: FromStr>(raw: &[u8]) -> Option<T> {
    core::str::from_utf8(raw).ok()?.parse().ok()
}

/// String decode with a fast path: a quoted span without backslashes is the
/// string itself, so only trim the quotes. Escaped strings take the general
/// decoder.
fn decode_string(raw: &[u8]) -> Option<String> {
    if raw.len() >= 2 && raw[0] == b'"' && raw[raw.len() - 1] == b'"' {
        let body = &raw[1..raw.len() - 1];
        if !body.contains(&b'\\') {
            return Some(body.to_str_lossy().into_owned());
        }
    }
    serde_json::from_slice(raw).ok()
}
