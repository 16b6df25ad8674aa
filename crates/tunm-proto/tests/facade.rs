#![allow(clippy::unwrap_used)]

use tunm_proto::{decode_proto, encode_proto, Buffer, Value};

#[test]
fn facade_exposes_codec() {
    let mut buffer = Buffer::new();
    encode_proto(&mut buffer, "ping", &[Value::from("pong")]);
    let (name, body) = decode_proto(&mut buffer).unwrap();
    assert_eq!(name, "ping");
    assert_eq!(body, Value::Arr(vec![Value::from("pong")]));
}
