#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;

use tunm_proto_core::{name_to_tag, tag_to_name, ProtoError, TypeTag, Value, ValueMap, ValueRef};

#[test]
fn get_num_scales_floats() {
    assert_eq!(Value::U8(12).get_num(), 12);
    assert_eq!(Value::I16(-5).get_num(), -5);
    assert_eq!(Value::Bool(true).get_num(), 1);
    assert_eq!(Value::Float(1.2345).get_num(), 1235);
    assert_eq!(Value::Double(-0.000_001_6).get_num(), -2);
    assert_eq!(Value::from("x").get_num(), 0);
}

#[test]
fn keys_match_on_variant_and_payload() {
    let mut map = ValueMap::new();
    map.insert(Value::U8(1), Value::from("u8"));
    map.insert(Value::U16(1), Value::from("u16"));
    map.insert(Value::from("1"), Value::from("str"));
    assert_eq!(map.len(), 3);
    assert_eq!(map[&Value::U16(1)], Value::from("u16"));
    assert!(map.get(&Value::Varint(1)).is_none());
}

#[test]
fn floats_hash_by_fixed_point() {
    let mut set = HashSet::new();
    set.insert(Value::Float(0.1));
    assert!(set.contains(&Value::Float(0.1000001)));
    assert!(!set.contains(&Value::Float(0.2)));
}

#[test]
fn map_equality_ignores_order() {
    let mut a = ValueMap::new();
    a.insert(Value::from("x"), Value::U8(1));
    a.insert(Value::from("y"), Value::U8(2));
    let mut b = ValueMap::new();
    b.insert(Value::from("y"), Value::U8(2));
    b.insert(Value::from("x"), Value::U8(1));
    assert_eq!(Value::Map(a), Value::Map(b));
}

#[test]
fn conversions() {
    let n: u32 = Value::from(7u32).try_into().unwrap();
    assert_eq!(n, 7);
    let s: String = Value::from("abc").try_into().unwrap();
    assert_eq!(s, "abc");

    let err = u8::try_from(Value::Varint(3)).unwrap_err();
    assert_eq!(
        err,
        ProtoError::TypeMismatch {
            expected: "u8",
            found: "varint"
        }
    );
    assert!(!err.is_recoverable());

    assert_eq!(Value::from(None::<u8>), Value::Nil);
    assert_eq!(Value::from(Some(2i8)), Value::I8(2));
    assert_eq!(Value::from(&b"ab"[..]), Value::Raw(vec![b'a', b'b']));
}

#[test]
fn accessors() {
    let mut map = ValueMap::new();
    map.insert(Value::from("index"), Value::U16(1));
    let v = Value::Map(map);
    assert_eq!(v.get("index").and_then(Value::as_i64), Some(1));
    assert!(v.get("missing").is_none());
    assert!(Value::U8(1).get("index").is_none());
    assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
    assert_eq!(Value::U64(9).as_i64(), Some(9));
    assert!(Value::from("s").as_i64().is_none());
}

#[test]
fn take_disowns_payload() {
    let mut v = Value::Arr(vec![Value::from("a")]);
    let moved = v.take();
    assert!(v.is_nil());
    assert_eq!(moved.as_arr().unwrap().len(), 1);
}

#[test]
fn views_copy_out() {
    let items = vec![Value::U8(1), Value::from("b")];
    let view = ValueRef::from(&items[..]);
    assert_eq!(view.tag(), TypeTag::Arr);
    assert_eq!(view.to_owned_value(), Value::Arr(items.clone()));
    assert_eq!(ValueRef::Double(0.5).get_num(), 500_000);
}

#[test]
fn registry_round_trips_every_tag() {
    for raw in 0..=17u8 {
        let tag = TypeTag::try_from(raw).unwrap();
        assert_eq!(tag.as_u8(), raw);
        assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        assert_eq!(name_to_tag(tag_to_name(raw)), raw);
    }
    assert_eq!(TypeTag::try_from(18).unwrap_err(), ProtoError::UnknownTag(18));
    assert_eq!(tag_to_name(200), "nil");
    assert_eq!(name_to_tag("nope"), 0);
    assert_eq!(Value::Varint(1).type_name(), "varint");
    assert_eq!(Value::Map(ValueMap::new()).tag(), TypeTag::Map);
}

#[test]
fn debug_form() {
    assert_eq!(format!("{}", Value::U8(12)), "u8(12)");
    assert_eq!(format!("{}", Value::from("a")), "str(\"a\")");
    assert_eq!(format!("{}", Value::Arr(vec![Value::Nil])), "arr([nil])");
}
