//! Field encoder.
//!
//! Layout per tag:
//! - nil: `[0]`
//! - bool: `[1, b]`, or `[1, b, 1]` with the legacy trailer
//! - u8/i8: `[tag, byte]`
//! - u16..i64 and varint: `[10, zigzag varint]`
//! - float/double: `[11|12, zigzag varint of value*1e3|value*1e6]`
//! - str: `[14, varint table index]` (interned, never inline)
//! - raw: `[15, varint len, bytes]`
//! - arr: `[16, varint count, field*]`
//! - map: `[17, varint count, (key field, value field)*]`

use crate::buffer::Buffer;
use crate::types::TypeTag;
use crate::value::{scale_double, scale_float, ValueRef};
use crate::varint::{encode_len, encode_varint};

fn encode_tag(buffer: &mut Buffer, tag: TypeTag) {
    buffer.write_u8(tag.as_u8());
}

/// Length-prefixed bytes with no tag: used for raw payloads and envelope strings.
pub fn encode_str_raw(buffer: &mut Buffer, data: &[u8]) {
    encode_len(buffer, data.len());
    buffer.write_bytes(data);
}

/// Intern `s` in `buffer` and write its index reference.
pub fn encode_str_idx(buffer: &mut Buffer, s: &str) {
    let idx = buffer.intern(s);
    encode_tag(buffer, TypeTag::StrIdx);
    encode_len(buffer, idx);
}

pub(crate) fn encode_field(buffer: &mut Buffer, value: ValueRef<'_>, bool_trailer: bool) {
    match value {
        ValueRef::Nil => encode_tag(buffer, TypeTag::Nil),
        ValueRef::Bool(b) => {
            encode_tag(buffer, TypeTag::Bool);
            buffer.write_u8(u8::from(b));
            if bool_trailer {
                encode_tag(buffer, TypeTag::Bool);
            }
        }
        ValueRef::U8(v) => {
            encode_tag(buffer, TypeTag::U8);
            buffer.write_u8(v);
        }
        ValueRef::I8(v) => {
            encode_tag(buffer, TypeTag::I8);
            buffer.write_i8(v);
        }
        ValueRef::U16(_)
        | ValueRef::I16(_)
        | ValueRef::U32(_)
        | ValueRef::I32(_)
        | ValueRef::U64(_)
        | ValueRef::I64(_)
        | ValueRef::Varint(_) => {
            encode_tag(buffer, TypeTag::Varint);
            encode_varint(buffer, value.get_num());
        }
        ValueRef::Float(v) => {
            encode_tag(buffer, TypeTag::Float);
            encode_varint(buffer, scale_float(v));
        }
        ValueRef::Double(v) => {
            encode_tag(buffer, TypeTag::Double);
            encode_varint(buffer, scale_double(v));
        }
        ValueRef::Str(s) => encode_str_idx(buffer, s),
        ValueRef::Raw(data) => {
            encode_tag(buffer, TypeTag::Raw);
            encode_str_raw(buffer, data);
        }
        ValueRef::Arr(items) => {
            encode_tag(buffer, TypeTag::Arr);
            encode_len(buffer, items.len());
            for item in items {
                encode_field(buffer, item.as_view(), bool_trailer);
            }
        }
        ValueRef::Map(map) => {
            encode_tag(buffer, TypeTag::Map);
            encode_len(buffer, map.len());
            for (k, v) in map {
                encode_field(buffer, k.as_view(), bool_trailer);
                encode_field(buffer, v.as_view(), bool_trailer);
            }
        }
    }
}
