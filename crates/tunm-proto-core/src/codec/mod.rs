//! Recursive field encode/decode.
//!
//! `Codec` carries a `CodecConfig`; the free functions use the default config.

pub mod decode;
pub mod encode;

use crate::buffer::Buffer;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::value::{Value, ValueRef};

pub use encode::{encode_str_idx, encode_str_raw};

#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode one field. Strings are interned into `buffer`'s own table.
    pub fn encode_field(&self, buffer: &mut Buffer, value: &Value) {
        self.encode_view(buffer, value.as_view());
    }

    /// Encode a view over caller-held data without copying it.
    pub fn encode_view(&self, buffer: &mut Buffer, value: ValueRef<'_>) {
        encode::encode_field(buffer, value, self.config.bool_trailer);
    }

    /// Decode one field. String references resolve against `buffer`'s table.
    pub fn decode_field(&self, buffer: &mut Buffer) -> Result<Value> {
        self.decoder().decode_field(buffer, 0)
    }

    pub(crate) fn decoder(&self) -> decode::Decoder<'_> {
        decode::Decoder {
            limits: &self.config.limits,
            bool_trailer: self.config.bool_trailer,
        }
    }
}

/// Encode one field with the default config.
pub fn encode_field(buffer: &mut Buffer, value: &Value) {
    Codec::default().encode_field(buffer, value);
}

/// Decode one field with the default config.
pub fn decode_field(buffer: &mut Buffer) -> Result<Value> {
    Codec::default().decode_field(buffer)
}
