//! tunm proto core: schema-less binary values, the byte buffer, and the codec.
//!
//! A message is a name, a per-message string table, and one encoded field
//! (normally an array). Strings inside the body are written as indices into
//! that table, so repeated keys cost one varint each.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Truncated input leaves the `Buffer` invalid and surfaces as a recoverable
//! `ProtoError`; data no conforming encoder emits (unknown tags, negative
//! lengths) surfaces as a contract error. Neither aborts the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod proto;
pub mod types;
pub mod value;
pub mod varint;

pub use buffer::Buffer;
pub use codec::{decode_field, encode_field, Codec};
pub use config::{CodecConfig, DecodeLimits};
pub use error::{ErrorClass, ProtoError, Result};
pub use proto::{decode_proto, encode_proto, Message};
pub use types::{name_to_tag, tag_to_name, TypeTag};
pub use value::{Value, ValueMap, ValueRef};
pub use varint::{decode_varint, encode_varint};
