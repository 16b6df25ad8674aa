//! Message envelope.
//!
//! Layout:
//! `[name: varint len + bytes][table count: varint][entry: varint len + bytes]*[body: one field]`
//!
//! The body is encoded first into a scratch buffer so its string table is
//! complete before the table is written ahead of it.

use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::codec::{encode_str_raw, Codec};
use crate::error::{ProtoError, Result};
use crate::value::{Value, ValueRef};
use crate::varint::encode_len;

/// A named message whose body is an array of fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Value>,
}

impl Message {
    pub fn new(name: impl Into<String>, fields: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl Codec {
    /// Frame `fields` as an array body under `name`.
    pub fn encode_proto(&self, dst: &mut Buffer, name: &str, fields: &[Value]) {
        self.encode_proto_body(dst, name, ValueRef::Arr(fields));
    }

    /// Frame an arbitrary body under `name`.
    pub fn encode_proto_body(&self, dst: &mut Buffer, name: &str, body: ValueRef<'_>) {
        let mut sub = Buffer::new();
        self.encode_view(&mut sub, body);

        let start = dst.write_pos();
        encode_str_raw(dst, name.as_bytes());
        encode_len(dst, sub.str_count());
        for s in sub.str_table() {
            encode_str_raw(dst, s.as_bytes());
        }
        trace!(name, header_bytes = dst.write_pos() - start, "proto header written");
        dst.extend_from(&sub);

        debug!(
            name,
            strs = sub.str_count(),
            bytes = dst.write_pos() - start,
            "proto encoded"
        );
    }

    /// Read an envelope: name, string table, then the body.
    ///
    /// `src`'s string table is replaced by the one on the wire.
    pub fn decode_proto(&self, src: &mut Buffer) -> Result<(String, Value)> {
        let decoder = self.decoder();
        let start = src.read_pos();

        let name = decoder.decode_string(src)?;
        let count = decoder.checked_len(src, self.config().limits.max_str_table)?;
        src.clear_str_table();
        for _ in 0..count {
            let s = decoder.decode_string(src)?;
            src.push_str(s);
        }

        let body = decoder.decode_field(src, 0)?;
        debug!(
            name = %name,
            strs = count,
            bytes = src.read_pos() - start,
            "proto decoded"
        );
        Ok((name, body))
    }

    pub fn encode_message(&self, dst: &mut Buffer, msg: &Message) {
        self.encode_proto(dst, &msg.name, &msg.fields);
    }

    /// Like [`Codec::decode_proto`], but the body must be an array.
    pub fn decode_message(&self, src: &mut Buffer) -> Result<Message> {
        let (name, body) = self.decode_proto(src)?;
        match body {
            Value::Arr(fields) => Ok(Message { name, fields }),
            other => Err(ProtoError::BodyNotArray(other.type_name())),
        }
    }
}

/// Frame `fields` under `name` with the default config.
pub fn encode_proto(dst: &mut Buffer, name: &str, fields: &[Value]) {
    Codec::default().encode_proto(dst, name, fields);
}

/// Read an envelope with the default config.
pub fn decode_proto(src: &mut Buffer) -> Result<(String, Value)> {
    Codec::default().decode_proto(src)
}
