//! Zig-zag variable-length integer codec.
//!
//! `n` is mapped onto unsigned space (`n*2` for non-negative, `(-(n+1))*2+1`
//! for negative) and emitted as 7-bit groups, least significant first. Every
//! byte except the last carries the continuation bit `0x80`.

use crate::buffer::Buffer;
use crate::error::{ProtoError, Result};

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Zig-zag map a signed integer onto unsigned space.
pub fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag`]: odd values are negative.
pub fn unzigzag(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Number of bytes [`encode_varint`] writes for `n` (minimum 1).
pub fn encoded_len(n: i64) -> usize {
    let bits = 64 - zigzag(n).leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Append the zig-zag varint of `n`.
pub fn encode_varint(buffer: &mut Buffer, n: i64) {
    let mut real = zigzag(n);
    loop {
        let data = (real as u8) & PAYLOAD;
        real >>= 7;
        if real == 0 {
            buffer.write_u8(data);
            break;
        }
        buffer.write_u8(data | CONTINUATION);
    }
}

/// Read one zig-zag varint.
///
/// Stops at the first read failure; groups beyond 64 bits are consumed but
/// contribute nothing, so a run of continuation bytes ends at the buffer's end.
pub fn decode_varint(buffer: &mut Buffer) -> Result<i64> {
    let mut real: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let data = buffer.read_u8()?;
        if shift < 64 {
            real |= u64::from(data & PAYLOAD) << shift;
        }
        shift = shift.saturating_add(7);
        if data & CONTINUATION == 0 {
            break;
        }
    }
    Ok(unzigzag(real))
}

/// Read a varint that must be a non-negative length, count or index.
pub(crate) fn decode_len(buffer: &mut Buffer) -> Result<u64> {
    let n = decode_varint(buffer)?;
    if n < 0 {
        buffer.invalidate();
        return Err(ProtoError::NegativeLength(n));
    }
    Ok(n as u64)
}

/// Write a non-negative length through the signed codec.
pub(crate) fn encode_len(buffer: &mut Buffer, len: usize) {
    encode_varint(buffer, len as i64);
}
