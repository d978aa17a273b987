use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec::Vec,
};

use quickcheck_macros::quickcheck;

use crate::{FieldType, RecordType, scan};

#[quickcheck]
fn never_panics_on_arbitrary_bytes(data: Vec<u8>) -> bool {
    let _ = scan(&data);
    true
}

#[quickcheck]
fn matches_the_reference_encoder(pairs: Vec<(u8, i64)>) -> bool {
    // serde_json is built with preserve_order for tests, so the map encodes
    // its members in insertion order and the scanner must give them back in
    // that same order.
    let mut map = serde_json::Map::new();
    for (k, v) in pairs {
        map.insert(format!("k{k}"), serde_json::Value::from(v));
    }
    let text = serde_json::to_string(&map).unwrap();

    let kvs = scan(text.as_bytes()).unwrap();
    kvs.len() == map.len()
        && kvs
            .iter()
            .zip(map.iter())
            .all(|(kv, (key, value))| {
                kv.key == key.as_str() && kv.value == value.to_string().as_bytes()
            })
}

#[quickcheck]
fn record_json_round_trips(int: i64, pint: Option<i64>, text: String) -> bool {
    let ty = RecordType::define("Abc")
        .field("int", FieldType::I64)
        .field("pint", FieldType::Optional(Box::new(FieldType::I64)))
        .field("str", FieldType::Str)
        .finish()
        .unwrap();
    let mut val = ty.new_value();
    val.set("int", int).unwrap();
    val.set("pint", pint).unwrap();
    val.set("str", text).unwrap();

    let mut back = ty.new_value();
    back.merge_json(val.to_json().unwrap().as_bytes()).unwrap();
    back == val
}
