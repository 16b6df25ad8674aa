#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tunm_proto_core::varint::{encoded_len, unzigzag, zigzag, MAX_VARINT_LEN};
use tunm_proto_core::{decode_varint, encode_varint, Buffer, ProtoError};

fn bytes_of(n: i64) -> Vec<u8> {
    let mut buffer = Buffer::new();
    encode_varint(&mut buffer, n);
    buffer.to_vec()
}

#[test]
fn zigzag_mapping() {
    assert_eq!(zigzag(0), 0);
    assert_eq!(zigzag(-1), 1);
    assert_eq!(zigzag(1), 2);
    assert_eq!(zigzag(-2), 3);
    assert_eq!(zigzag(i64::MAX), u64::MAX - 1);
    assert_eq!(zigzag(i64::MIN), u64::MAX);
    for n in [0, 1, -1, 63, -64, i64::MAX, i64::MIN] {
        assert_eq!(unzigzag(zigzag(n)), n);
    }
}

#[test]
fn known_encodings() {
    assert_eq!(bytes_of(0), vec![0]);
    assert_eq!(bytes_of(-1), vec![1]);
    assert_eq!(bytes_of(63), vec![126]);
    assert_eq!(bytes_of(64), vec![0x80, 0x01]);
    assert_eq!(bytes_of(0x1234), vec![232, 72]);
    assert_eq!(bytes_of(12_345_123), vec![198, 252, 226, 11]);
}

#[test]
fn symmetric_over_edges() {
    let mut samples = vec![0i64, 1, -1, i64::MAX, i64::MIN, i64::MAX - 1, i64::MIN + 1];
    for shift in 0..63 {
        let p = 1i64 << shift;
        samples.extend([p, -p, p - 1, -(p - 1), p + 1]);
    }

    let mut buffer = Buffer::new();
    for &n in &samples {
        encode_varint(&mut buffer, n);
    }
    for &n in &samples {
        let before = buffer.read_pos();
        assert_eq!(decode_varint(&mut buffer).unwrap(), n);
        assert_eq!(buffer.read_pos() - before, encoded_len(n), "n={n}");
    }
    assert!(buffer.is_empty());
}

#[test]
fn encoded_len_bounds() {
    assert_eq!(encoded_len(0), 1);
    assert_eq!(encoded_len(-64), 1);
    assert_eq!(encoded_len(64), 2);
    assert_eq!(encoded_len(i64::MIN), MAX_VARINT_LEN);
}

#[test]
fn unterminated_varint_ends_at_buffer_end() {
    let mut buffer = Buffer::from(vec![0xff; 32]);
    let err = decode_varint(&mut buffer).unwrap_err();
    assert!(matches!(err, ProtoError::Exhausted { .. }));
    assert_eq!(buffer.read_pos(), 32);
    assert!(!buffer.is_valid());
}
