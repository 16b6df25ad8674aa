//! Growable byte buffer with independent read/write cursors.
//!
//! Rules:
//! - Reads are bounded by `write_pos`, never by storage length.
//! - The first read that would overrun flips `valid` to false. From then on
//!   every read returns `ProtoError::Invalid` and leaves the cursor alone.
//! - Fixed-width values are little-endian on the wire regardless of host order.
//! - Each buffer owns its string table; nothing is shared between buffers.

use std::collections::HashMap;
use std::fmt;
use std::io;

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::error::{ProtoError, Result};

/// Initial storage reserved by [`Buffer::new`].
pub const DEFAULT_CAPACITY: usize = 0x1000;

/// Storage above this size is released once everything has been read.
pub const SHRINK_THRESHOLD: usize = 512 * 1024;

pub struct Buffer {
    val: BytesMut,
    rpos: usize,
    wpos: usize,
    valid: bool,
    str_arr: Vec<String>,
    str_map: HashMap<String, usize>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            val: BytesMut::with_capacity(capacity),
            rpos: 0,
            wpos: 0,
            valid: true,
            str_arr: Vec::new(),
            str_map: HashMap::new(),
        }
    }

    /// Intern `name`, returning its existing index or appending it.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.str_map.get(name) {
            return idx;
        }
        let idx = self.str_arr.len();
        self.str_arr.push(name.to_owned());
        self.str_map.insert(name.to_owned(), idx);
        trace!(idx, name, "interned string");
        idx
    }

    /// Append `name` at the next index even if it is already present.
    ///
    /// Used when loading a table off the wire so indices match the sender's.
    /// Lookups through [`Buffer::intern`] keep returning the first index.
    pub fn push_str(&mut self, name: String) -> usize {
        let idx = self.str_arr.len();
        self.str_map.entry(name.clone()).or_insert(idx);
        self.str_arr.push(name);
        idx
    }

    /// Drop every interned string.
    pub fn clear_str_table(&mut self) {
        self.str_arr.clear();
        self.str_map.clear();
    }

    /// Look up an interned string by index.
    pub fn resolve(&self, idx: u64) -> Result<&str> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.str_arr.get(i))
            .map(String::as_str)
            .ok_or(ProtoError::StrIndexOutOfRange {
                index: idx,
                len: self.str_arr.len(),
            })
    }

    /// Interned strings in insertion (index) order.
    pub fn str_table(&self) -> &[String] {
        &self.str_arr
    }

    pub fn str_count(&self) -> usize {
        self.str_arr.len()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the buffer invalid. Sticky until [`Buffer::clear`].
    pub fn invalidate(&mut self) {
        if self.valid {
            debug!(rpos = self.rpos, wpos = self.wpos, "buffer invalidated");
        }
        self.valid = false;
    }

    pub fn read_pos(&self) -> usize {
        self.rpos
    }

    pub fn write_pos(&self) -> usize {
        self.wpos
    }

    /// Move the read cursor, clamped to `write_pos`.
    pub fn set_read_pos(&mut self, rpos: usize) {
        self.rpos = rpos.min(self.wpos);
    }

    /// Move the write cursor, growing storage (zero-filled) when it passes the end.
    pub fn set_write_pos(&mut self, wpos: usize) {
        if wpos > self.val.len() {
            self.val.resize(wpos, 0);
        }
        self.wpos = wpos;
    }

    /// Storage length (may exceed `write_pos`).
    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_len() == 0
    }

    /// Bytes between the read and write cursors.
    pub fn data_len(&self) -> usize {
        self.wpos.saturating_sub(self.rpos)
    }

    /// Unread bytes, `read_pos..write_pos`.
    pub fn unread(&self) -> &[u8] {
        if self.rpos >= self.wpos {
            return &[];
        }
        &self.val[self.rpos..self.wpos]
    }

    /// Copy of the unread bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.unread().to_vec()
    }

    /// Copy of the unread bytes as `Bytes`.
    pub fn freeze(&self) -> Bytes {
        Bytes::copy_from_slice(self.unread())
    }

    /// Consume the buffer, returning the unread bytes without copying.
    pub fn into_bytes(self) -> Bytes {
        let (rpos, wpos) = (self.rpos, self.wpos);
        let mut val = self.val;
        val.truncate(wpos);
        val.advance(rpos.min(val.len()));
        val.freeze()
    }

    /// Reset cursors, validity and the string table. Storage is kept.
    pub fn clear(&mut self) {
        self.val.clear();
        self.rpos = 0;
        self.wpos = 0;
        self.valid = true;
        self.str_arr.clear();
        self.str_map.clear();
    }

    // ---- writes ----

    pub fn write_bytes(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let end = self.wpos + data.len();
        if self.val.len() < end {
            self.val.resize(end, 0);
        }
        self.val[self.wpos..end].copy_from_slice(data);
        self.wpos = end;
    }

    /// Append another buffer's unread bytes. Its string table is not copied.
    pub fn extend_from(&mut self, other: &Buffer) {
        self.write_bytes(other.unread());
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_bytes(&v.to_le_bytes());
    }

    // ---- reads ----

    /// Borrow the next `n` unread bytes and advance past them.
    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if !self.valid {
            return Err(ProtoError::Invalid);
        }
        let left = self.data_len();
        let start = self.rpos;
        let end = start.saturating_add(n);
        if n > left || end > self.val.len() {
            self.invalidate();
            return Err(ProtoError::Exhausted { need: n, left });
        }
        self.rpos = end;
        Ok(&self.val[start..end])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.take(n).map(<[u8]>::to_vec)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?.get_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.take(2)?.get_u16_le())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.take(2)?.get_i16_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.take(4)?.get_u32_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.take(4)?.get_i32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.take(8)?.get_u64_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.take(8)?.get_i64_le())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.take(4)?.get_f32_le())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.take(8)?.get_f64_le())
    }

    // ---- housekeeping ----

    /// Drop the first `n` bytes of storage, shifting both cursors back.
    pub fn drain(&mut self, n: usize) {
        let n = n.min(self.val.len());
        self.rpos -= self.rpos.min(n);
        self.wpos -= self.wpos.min(n);
        self.val.advance(n);
        self.compact();
    }

    /// Reclaim space already read.
    ///
    /// Fully read: cursors reset to zero and oversized storage is released.
    /// Read cursor past half the storage: unread bytes move to the front.
    pub fn compact(&mut self) {
        if self.rpos >= self.wpos {
            self.rpos = 0;
            self.wpos = 0;
            if self.val.len() > SHRINK_THRESHOLD {
                warn!(len_kib = self.val.len() / 1024, "buffer over 512k, shrinking");
                self.val = BytesMut::with_capacity(DEFAULT_CAPACITY);
            } else {
                self.val.clear();
            }
        } else if self.rpos > self.val.len() / 2 {
            let left = self.wpos - self.rpos;
            debug!(rpos = self.rpos, left, "compacting buffer");
            self.val.copy_within(self.rpos..self.wpos, 0);
            self.val.truncate(left);
            self.rpos = 0;
            self.wpos = left;
        }
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        let mut buffer = Buffer::with_capacity(data.len());
        buffer.write_bytes(data);
        buffer
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Buffer::from(&data[..])
    }
}

impl From<Bytes> for Buffer {
    fn from(data: Bytes) -> Self {
        Buffer::from(&data[..])
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("rpos", &self.rpos)
            .field("wpos", &self.wpos)
            .field("valid", &self.valid)
            .field("strs", &self.str_arr)
            .finish()
    }
}

impl io::Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data_len().min(buf.len());
        if n == 0 || !self.valid {
            return Ok(0);
        }
        buf[..n].copy_from_slice(&self.val[self.rpos..self.rpos + n]);
        self.rpos += n;
        Ok(n)
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
