//! Top-level facade crate for tunm proto.
//!
//! Re-exports the codec so users can depend on a single crate.

pub use tunm_proto_core::*;
