use alloc::{
    boxed::Box,
    string::{String, ToString},
    sync::Arc,
};

use crate::{DecodeError, FieldType, FieldValue, RecordType, scan};

fn abc() -> Arc<RecordType> {
    RecordType::define("Abc")
        .field("int", FieldType::I64)
        .field("pint", FieldType::Optional(Box::new(FieldType::I64)))
        .field("str", FieldType::Str)
        .finish()
        .unwrap()
}

#[test]
fn encodes_zero_value() {
    let val = abc().new_value();
    assert_eq!(val.to_json().unwrap(), r#"{"int":0,"pint":null,"str":""}"#);
}

#[test]
fn encodes_members_in_definition_order() {
    let ty = RecordType::define("Abc")
        .field("int8", FieldType::I8)
        .field("pint", FieldType::Optional(Box::new(FieldType::I64)))
        .field("str", FieldType::Str)
        .finish()
        .unwrap();
    let mut val = ty.new_value();
    val.set("int8", 123i8).unwrap();
    val.set("pint", Some(456i64)).unwrap();
    val.set("str", "789".to_string()).unwrap();
    assert_eq!(
        val.to_json().unwrap(),
        r#"{"int8":123,"pint":456,"str":"789"}"#
    );

    val.set("pint", None::<i64>).unwrap();
    assert_eq!(
        val.to_json().unwrap(),
        r#"{"int8":123,"pint":null,"str":"789"}"#
    );
}

#[test]
fn decodes_members_by_kind() {
    let mut val = abc().new_value();
    val.merge_json(br#"{"int":123,"pint":456,"str":"789"}"#)
        .unwrap();
    assert_eq!(val.scan::<i64>("int").unwrap(), 123);
    assert_eq!(val.scan::<Option<i64>>("pint").unwrap(), Some(456));
    assert_eq!(val.scan::<String>("str").unwrap(), "789");
}

#[test]
fn absent_members_reset_to_zero() {
    let mut val = abc().new_value();
    val.merge_json(br#"{"int":123,"pint":456,"str":"789"}"#)
        .unwrap();
    val.merge_json(b"{}").unwrap();
    assert_eq!(val.scan::<i64>("int").unwrap(), 0);
    assert_eq!(val.scan::<Option<i64>>("pint").unwrap(), None);
    assert_eq!(val.scan::<String>("str").unwrap(), "");
}

#[test]
fn unknown_members_are_ignored() {
    let mut val = abc().new_value();
    val.merge_json(br#"{"int":123,"abc":"ABC"}"#).unwrap();
    assert_eq!(val.scan::<i64>("int").unwrap(), 123);
    assert_eq!(val.scan::<Option<i64>>("pint").unwrap(), None);
    assert_eq!(val.scan::<String>("str").unwrap(), "");
}

#[test]
fn explicit_null_clears_an_optional() {
    let mut val = abc().new_value();
    val.set("pint", Some(456i64)).unwrap();
    val.merge_json(br#"{"int":1,"pint":null,"str":"x"}"#).unwrap();
    assert_eq!(val.scan::<Option<i64>>("pint").unwrap(), None);
}

#[test]
fn shape_mismatch_fails_decode_but_not_scan() {
    let data = br#"{"int":"abc"}"#;

    // The scanner has no schema; it still yields the raw pair.
    let kvs = scan(data).unwrap();
    assert_eq!(kvs[0].key, "int");
    assert_eq!(kvs[0].value, br#""abc""#);

    let mut val = abc().new_value();
    let err = val.merge_json(data).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Field {
            record: "Abc".to_string(),
            field: "int".to_string(),
            expected: FieldType::I64,
        }
    );
}

#[test]
fn syntax_error_is_fatal_and_generic() {
    let mut val = abc().new_value();
    val.set("int", 9i64).unwrap();
    let err = val.merge_json(br#"{"int":1"#).unwrap_err();
    assert!(matches!(err, DecodeError::Syntax(_)));
    assert_eq!(err.to_string(), "invalid json");
    // A syntax error produces no pairs, so nothing was overwritten.
    assert_eq!(val.scan::<i64>("int").unwrap(), 9);
}

#[test]
fn integer_overflow_is_a_field_error() {
    let ty = RecordType::define("Tiny")
        .field("int8", FieldType::I8)
        .finish()
        .unwrap();
    let mut val = ty.new_value();
    assert!(val.merge_json(br#"{"int8":1234}"#).is_err());
    assert!(val.merge_json(br#"{"int8":-129}"#).is_err());
    val.merge_json(br#"{"int8":-128}"#).unwrap();
    assert_eq!(val.scan::<i8>("int8").unwrap(), -128);
}

#[test]
fn unsigned_rejects_sign_and_fraction() {
    let ty = RecordType::define("Un")
        .field("u", FieldType::U32)
        .finish()
        .unwrap();
    let mut val = ty.new_value();
    assert!(val.merge_json(br#"{"u":-1}"#).is_err());
    assert!(val.merge_json(br#"{"u":1.5}"#).is_err());
    val.merge_json(br#"{"u":4294967295}"#).unwrap();
    assert_eq!(val.scan::<u32>("u").unwrap(), u32::MAX);
}

#[test]
fn escaped_strings_take_the_general_decoder() {
    let ty = RecordType::define("S")
        .field("s", FieldType::Str)
        .finish()
        .unwrap();
    let mut val = ty.new_value();

    val.merge_json(br#"{"s":"plain"}"#).unwrap();
    assert_eq!(val.scan::<String>("s").unwrap(), "plain");

    val.merge_json(br#"{"s":"a\"bA\n"}"#).unwrap();
    assert_eq!(val.scan::<String>("s").unwrap(), "a\"bA\n");

    // A non-string span cannot decode into a string field.
    assert!(val.merge_json(br#"{"s":123}"#).is_err());
}

#[test]
fn any_field_takes_arbitrary_shapes() {
    let ty = RecordType::define("Holder")
        .field("any", FieldType::Any)
        .finish()
        .unwrap();
    let mut val = ty.new_value();

    val.merge_json(br#"{"any":{"x":[1,2],"y":null}}"#).unwrap();
    assert_eq!(
        val.get("any").unwrap(),
        &FieldValue::Any(serde_json::json!({"x": [1, 2], "y": null}))
    );

    val.merge_json(br#"{"any":[1,"two",3.5]}"#).unwrap();
    assert_eq!(
        val.get("any").unwrap(),
        &FieldValue::Any(serde_json::json!([1, "two", 3.5]))
    );
}

#[test]
fn round_trips_every_primitive_kind() {
    let ty = RecordType::define("All")
        .field("b", FieldType::Bool)
        .field("i8", FieldType::I8)
        .field("i16", FieldType::I16)
        .field("i32", FieldType::I32)
        .field("i64", FieldType::I64)
        .field("u8", FieldType::U8)
        .field("u16", FieldType::U16)
        .field("u32", FieldType::U32)
        .field("u64", FieldType::U64)
        .field("f32", FieldType::F32)
        .field("f64", FieldType::F64)
        .field("s", FieldType::Str)
        .field("es", FieldType::Str)
        .field("p", FieldType::Optional(Box::new(FieldType::U16)))
        .field("np", FieldType::Optional(Box::new(FieldType::U16)))
        .finish()
        .unwrap();

    let mut val = ty.new_value();
    val.set("b", true).unwrap();
    val.set("i8", i8::MIN).unwrap();
    val.set("i16", -12345i16).unwrap();
    val.set("i32", i32::MAX).unwrap();
    val.set("i64", i64::MIN).unwrap();
    val.set("u8", u8::MAX).unwrap();
    val.set("u16", 65535u16).unwrap();
    val.set("u32", 7u32).unwrap();
    val.set("u64", u64::MAX).unwrap();
    val.set("f32", 3.5f32).unwrap();
    val.set("f64", 1234.5678f64).unwrap();
    val.set("s", "789".to_string()).unwrap();
    val.set("es", "a\"b\\c\n".to_string()).unwrap();
    val.set("p", Some(456u16)).unwrap();
    val.set("np", None::<u16>).unwrap();

    let text = val.to_json().unwrap();
    let mut back = ty.new_value();
    back.merge_json(text.as_bytes()).unwrap();
    assert_eq!(back, val);
}
