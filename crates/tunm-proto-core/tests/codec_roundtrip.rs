//! Field and envelope round trips through the codec.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tunm_proto_core::{
    decode_field, decode_proto, encode_field, encode_proto, Buffer, Codec, CodecConfig,
    DecodeLimits, Message, ProtoError, Value, ValueMap, ValueRef,
};

fn roundtrip(value: &Value) -> Value {
    let mut buffer = Buffer::new();
    encode_field(&mut buffer, value);
    let out = decode_field(&mut buffer).unwrap();
    assert!(buffer.is_valid());
    assert_eq!(buffer.data_len(), 0);
    out
}

fn sample_map() -> ValueMap {
    let mut map = ValueMap::new();
    map.insert(Value::from("name"), Value::from("I'm a chinese people"));
    map.insert(Value::from("sub_name"), Value::from("tickdream"));
    map.insert(Value::from("index"), Value::Varint(1));
    map
}

#[test]
fn scalars_keep_their_variant() {
    for value in [
        Value::Nil,
        Value::Bool(true),
        Value::Bool(false),
        Value::U8(255),
        Value::I8(-128),
        Value::Varint(i64::MIN),
        Value::Varint(i64::MAX),
        Value::Str("héllo".into()),
        Value::Str(String::new()),
        Value::Raw(vec![0, 1, 2, 255]),
        Value::Raw(Vec::new()),
    ] {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn wide_integers_collapse_to_varint() {
    let cases = [
        (Value::U16(u16::MAX), i64::from(u16::MAX)),
        (Value::I16(i16::MIN), i64::from(i16::MIN)),
        (Value::U32(0x1234_5678), 0x1234_5678),
        (Value::I32(-7), -7),
        (Value::U64(1 << 40), 1 << 40),
        (Value::I64(-(1 << 50)), -(1 << 50)),
    ];
    for (value, n) in cases {
        assert_eq!(roundtrip(&value), Value::Varint(n), "value={value}");
    }
}

#[test]
fn float_and_double_keep_fixed_point_precision() {
    let out = roundtrip(&Value::Float(12345.123));
    let f = out.as_f32().unwrap();
    assert!((f - 12345.123).abs() < 0.001 + f32::EPSILON * 12345.0);
    assert_eq!(out, Value::Float(12345.123));

    let out = roundtrip(&Value::Double(-3.141_592_6));
    assert_eq!(out.get_num(), -3_141_593);
    assert!((out.as_f64().unwrap() - -3.141_593).abs() < 1e-9);

    // Digits past the scale are rounded away.
    assert_eq!(roundtrip(&Value::Float(0.0004)), Value::Float(0.0));
    assert_eq!(roundtrip(&Value::Float(0.0005)).get_num(), 1);
}

#[test]
fn nested_containers() {
    let mut inner = sample_map();
    inner.insert(Value::U8(7), Value::Arr(vec![Value::Nil, Value::Bool(true)]));
    let value = Value::Arr(vec![
        Value::Map(inner),
        Value::Arr((0..10u8).map(Value::U8).collect()),
        Value::Arr(Vec::new()),
        Value::Map(ValueMap::new()),
    ]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn map_keeps_insertion_order() {
    let map = sample_map();
    let out = roundtrip(&Value::Map(map.clone()));
    let keys: Vec<&Value> = out.as_map().unwrap().keys().collect();
    let expected: Vec<&Value> = map.keys().collect();
    assert_eq!(keys, expected);
}

#[test]
fn repeated_strings_share_one_table_entry() {
    let fields = vec![
        Value::from("hero"),
        Value::Arr(vec![Value::from("hero"), Value::from("hero")]),
        Value::from("mage"),
    ];
    let mut scratch = Buffer::new();
    encode_field(&mut scratch, &Value::Arr(fields.clone()));
    assert_eq!(scratch.str_table(), &["hero".to_string(), "mage".to_string()]);
    // arr(3): str_idx 0, arr(2): str_idx 0, str_idx 0, then str_idx 1
    assert_eq!(
        scratch.to_vec(),
        vec![16, 6, 14, 0, 16, 4, 14, 0, 14, 0, 14, 2]
    );

    let mut buffer = Buffer::new();
    encode_proto(&mut buffer, "cmd", &fields);
    let (_, body) = decode_proto(&mut buffer).unwrap();
    assert_eq!(buffer.str_count(), 2);
    assert_eq!(body, Value::Arr(fields));
}

#[test]
fn proto_roundtrip_through_bytes() {
    let fields = vec![
        Value::Map(sample_map()),
        Value::U8(3),
        Value::Raw(b"blob".to_vec()),
        Value::Double(2.5),
    ];
    let mut out = Buffer::new();
    encode_proto(&mut out, "cmd_test_op", &fields);
    let wire = out.into_bytes();

    let mut input = Buffer::from(wire);
    let (name, body) = decode_proto(&mut input).unwrap();
    assert_eq!(name, "cmd_test_op");
    assert_eq!(body, Value::Arr(fields));
    assert!(input.is_valid());
}

#[test]
fn messages_back_to_back_in_one_buffer() {
    let codec = Codec::default();
    let first = Message::new("login", vec![Value::from("alice")]);
    let second = Message::new("move", vec![Value::from("north"), Value::Varint(3)]);

    let mut buffer = Buffer::new();
    codec.encode_message(&mut buffer, &first);
    codec.encode_message(&mut buffer, &second);

    assert_eq!(codec.decode_message(&mut buffer).unwrap(), first);
    assert_eq!(codec.decode_message(&mut buffer).unwrap(), second);
    assert_eq!(buffer.data_len(), 0);
}

#[test]
fn decode_message_requires_array_body() {
    let codec = Codec::default();
    let mut buffer = Buffer::new();
    codec.encode_proto_body(&mut buffer, "ping", ValueRef::U8(1));
    let err = codec.decode_message(&mut buffer).unwrap_err();
    assert_eq!(err, ProtoError::BodyNotArray("u8"));
}

#[test]
fn view_encoding_matches_owned_encoding() {
    let map = sample_map();
    let raw = [9u8, 8, 7];
    let mut owned = Buffer::new();
    let mut viewed = Buffer::new();
    let codec = Codec::default();

    codec.encode_field(&mut owned, &Value::Map(map.clone()));
    codec.encode_field(&mut owned, &Value::from("caller text"));
    codec.encode_field(&mut owned, &Value::Raw(raw.to_vec()));

    codec.encode_view(&mut viewed, ValueRef::from(&map));
    codec.encode_view(&mut viewed, ValueRef::from("caller text"));
    codec.encode_view(&mut viewed, ValueRef::from(&raw[..]));

    assert_eq!(owned.to_vec(), viewed.to_vec());
    assert_eq!(owned.str_table(), viewed.str_table());
}

#[test]
fn invalid_buffer_stays_invalid() {
    let mut buffer = Buffer::from(vec![16, 6, 2, 1]);
    let err = decode_field(&mut buffer).unwrap_err();
    assert!(matches!(err, ProtoError::Exhausted { .. }));
    assert!(!buffer.is_valid());

    // Appending data does not revive it, and nothing more is consumed.
    buffer.write_bytes(&[2, 5]);
    let rpos = buffer.read_pos();
    assert_eq!(decode_field(&mut buffer).unwrap_err(), ProtoError::Invalid);
    assert_eq!(decode_field(&mut buffer).unwrap_err(), ProtoError::Invalid);
    assert_eq!(buffer.read_pos(), rpos);
    assert!(!buffer.is_valid());

    buffer.clear();
    assert!(buffer.is_valid());
}

#[test]
fn every_truncation_fails_cleanly() {
    let mut full = Buffer::new();
    encode_proto(&mut full, "cmd_test_op", &[Value::Map(sample_map()), Value::Double(1.25)]);
    let wire = full.to_vec();

    for cut in 0..wire.len() {
        let mut buffer = Buffer::from(&wire[..cut]);
        let err = decode_proto(&mut buffer).unwrap_err();
        assert!(err.is_recoverable(), "cut={cut} err={err}");
        assert!(!buffer.is_valid(), "cut={cut}");
    }
}

#[test]
fn depth_limit_stops_deep_nesting() {
    let config = CodecConfig {
        limits: DecodeLimits {
            max_depth: 4,
            ..DecodeLimits::default()
        },
        ..CodecConfig::default()
    };
    let codec = Codec::new(config);

    let mut value = Value::Nil;
    for _ in 0..4 {
        value = Value::Arr(vec![value]);
    }
    let mut buffer = Buffer::new();
    codec.encode_field(&mut buffer, &value);
    assert_eq!(codec.decode_field(&mut buffer).unwrap(), value);

    let deeper = Value::Arr(vec![value]);
    let mut buffer = Buffer::new();
    codec.encode_field(&mut buffer, &deeper);
    assert_eq!(
        codec.decode_field(&mut buffer).unwrap_err(),
        ProtoError::DepthExceeded(4)
    );
    assert!(!buffer.is_valid());
}

#[test]
fn declared_length_over_limit_is_rejected_before_reading() {
    let config = CodecConfig {
        limits: DecodeLimits {
            max_bytes_len: 4,
            ..DecodeLimits::default()
        },
        ..CodecConfig::default()
    };
    let codec = Codec::new(config);
    let mut buffer = Buffer::new();
    codec.encode_field(&mut buffer, &Value::Raw(vec![0; 5]));
    let err = codec.decode_field(&mut buffer).unwrap_err();
    assert_eq!(err, ProtoError::LengthExceeded { len: 5, limit: 4 });
    assert!(err.is_recoverable());
}

#[test]
fn huge_declared_count_does_not_allocate_or_hang() {
    // arr with count i64::MAX / 2 and nothing after it
    let mut buffer = Buffer::new();
    buffer.write_u8(16);
    tunm_proto_core::encode_varint(&mut buffer, i64::MAX / 2);
    let err = decode_field(&mut buffer).unwrap_err();
    assert!(matches!(err, ProtoError::LengthExceeded { .. }));
}

#[test]
fn bool_layouts() {
    let mut buffer = Buffer::new();
    encode_field(&mut buffer, &Value::Bool(true));
    encode_field(&mut buffer, &Value::U8(4));
    assert_eq!(buffer.to_vec(), vec![1, 1, 2, 4]);

    let legacy = Codec::new(CodecConfig {
        bool_trailer: true,
        ..CodecConfig::default()
    });
    let mut buffer = Buffer::new();
    legacy.encode_field(&mut buffer, &Value::Bool(false));
    legacy.encode_field(&mut buffer, &Value::U8(4));
    assert_eq!(buffer.to_vec(), vec![1, 0, 1, 2, 4]);
    assert_eq!(legacy.decode_field(&mut buffer).unwrap(), Value::Bool(false));
    assert_eq!(legacy.decode_field(&mut buffer).unwrap(), Value::U8(4));
}

#[test]
fn nonzero_bool_byte_is_true() {
    let mut buffer = Buffer::from(vec![1, 7]);
    assert_eq!(decode_field(&mut buffer).unwrap(), Value::Bool(true));
}
