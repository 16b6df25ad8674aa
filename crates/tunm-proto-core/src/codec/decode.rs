//! Field decoder (panic-free).
//!
//! Parsing rules:
//! - Every primitive read goes through `Buffer`, which bounds it by `write_pos`.
//! - The first failure leaves the buffer invalid and returns through `?`; no
//!   read is attempted once the buffer is invalid.
//! - Declared counts and lengths are checked against `DecodeLimits` before any
//!   allocation, and preallocation never exceeds the bytes actually left.

use tracing::warn;

use crate::buffer::Buffer;
use crate::config::DecodeLimits;
use crate::error::{ProtoError, Result};
use crate::types::TypeTag;
use crate::value::{Value, ValueMap, DOUBLE_SCALE, FLOAT_SCALE};
use crate::varint::{decode_len, decode_varint};

pub(crate) struct Decoder<'c> {
    pub limits: &'c DecodeLimits,
    pub bool_trailer: bool,
}

impl Decoder<'_> {
    fn fail(&self, buffer: &mut Buffer, err: ProtoError) -> ProtoError {
        buffer.invalidate();
        err
    }

    pub fn checked_len(&self, buffer: &mut Buffer, limit: usize) -> Result<usize> {
        let len = decode_len(buffer)?;
        match usize::try_from(len) {
            Ok(n) if n <= limit => Ok(n),
            _ => Err(self.fail(buffer, ProtoError::LengthExceeded { len, limit })),
        }
    }

    /// Varint length then that many bytes.
    pub fn decode_str_raw(&self, buffer: &mut Buffer) -> Result<Vec<u8>> {
        let len = self.checked_len(buffer, self.limits.max_bytes_len)?;
        buffer.read_bytes(len)
    }

    /// Length-prefixed UTF-8 string.
    pub fn decode_string(&self, buffer: &mut Buffer) -> Result<String> {
        let raw = self.decode_str_raw(buffer)?;
        String::from_utf8(raw).map_err(|_| self.fail(buffer, ProtoError::InvalidUtf8))
    }

    pub fn decode_field(&self, buffer: &mut Buffer, depth: usize) -> Result<Value> {
        if !buffer.is_valid() {
            return Err(ProtoError::Invalid);
        }
        let raw = buffer.read_u8()?;
        let tag = match TypeTag::try_from(raw) {
            Ok(tag) => tag,
            Err(e) => {
                warn!(tag = raw, rpos = buffer.read_pos(), "unknown type tag");
                return Err(self.fail(buffer, e));
            }
        };

        let value = match tag {
            TypeTag::Nil => Value::Nil,
            TypeTag::Bool => {
                let b = buffer.read_u8()? != 0;
                if self.bool_trailer {
                    buffer.read_u8()?;
                }
                Value::Bool(b)
            }
            TypeTag::U8 => Value::U8(buffer.read_u8()?),
            TypeTag::I8 => Value::I8(buffer.read_i8()?),
            TypeTag::U16
            | TypeTag::I16
            | TypeTag::U32
            | TypeTag::I32
            | TypeTag::U64
            | TypeTag::I64
            | TypeTag::Varint => Value::Varint(decode_varint(buffer)?),
            TypeTag::Float => {
                let n = decode_varint(buffer)?;
                Value::Float((n as f64 / FLOAT_SCALE) as f32)
            }
            TypeTag::Double => {
                let n = decode_varint(buffer)?;
                Value::Double(n as f64 / DOUBLE_SCALE)
            }
            TypeTag::Str => Value::Str(self.decode_string(buffer)?),
            TypeTag::StrIdx => {
                let idx = decode_len(buffer)?;
                let resolved = buffer.resolve(idx).map(str::to_owned);
                match resolved {
                    Ok(s) => Value::Str(s),
                    Err(e) => return Err(self.fail(buffer, e)),
                }
            }
            TypeTag::Raw => Value::Raw(self.decode_str_raw(buffer)?),
            TypeTag::Arr => Value::Arr(self.decode_arr(buffer, depth)?),
            TypeTag::Map => Value::Map(self.decode_map(buffer, depth)?),
        };
        Ok(value)
    }

    fn enter(&self, buffer: &mut Buffer, depth: usize) -> Result<usize> {
        if depth >= self.limits.max_depth {
            return Err(self.fail(buffer, ProtoError::DepthExceeded(self.limits.max_depth)));
        }
        self.checked_len(buffer, self.limits.max_container_len)
    }

    fn decode_arr(&self, buffer: &mut Buffer, depth: usize) -> Result<Vec<Value>> {
        let len = self.enter(buffer, depth)?;
        // Every element takes at least one byte.
        let mut arr = Vec::with_capacity(len.min(buffer.data_len()));
        for _ in 0..len {
            arr.push(self.decode_field(buffer, depth + 1)?);
        }
        Ok(arr)
    }

    fn decode_map(&self, buffer: &mut Buffer, depth: usize) -> Result<ValueMap> {
        let len = self.enter(buffer, depth)?;
        // Every entry takes at least two bytes.
        let mut map = ValueMap::with_capacity(len.min(buffer.data_len() / 2));
        for _ in 0..len {
            let key = self.decode_field(buffer, depth + 1)?;
            let value = self.decode_field(buffer, depth + 1)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}
