//! # Wire Codec
//!
//! Bounded byte reader and the Bitcoin CompactSize varint.
//!
//! ```text
//! value < 0xfd          -> [value]
//! value <= 0xffff       -> [0xfd, u16 LE]
//! value <= 0xffff_ffff  -> [0xfe, u32 LE]
//! otherwise             -> [0xff, u64 LE]
//! ```
//!
//! Non-minimal encodings are rejected on read.

use crate::domain::{Hash, MirrorError};

/// Cursor over an untrusted byte slice. Never reads past the end.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Unconsumed tail, for codecs that decode in place.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume `n` bytes.
    pub fn read_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], MirrorError> {
        if n > self.remaining() {
            return Err(MirrorError::Truncated {
                field,
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Skip `n` bytes already decoded by an external codec.
    pub fn advance(&mut self, n: usize, field: &'static str) -> Result<(), MirrorError> {
        self.read_bytes(n, field).map(|_| ())
    }

    /// Consume a fixed-size array.
    pub fn read_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], MirrorError> {
        let bytes = self.read_bytes(N, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Consume a 32-byte hash.
    pub fn read_hash(&mut self, field: &'static str) -> Result<Hash, MirrorError> {
        self.read_array::<32>(field)
    }

    /// Consume one byte.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, MirrorError> {
        Ok(self.read_array::<1>(field)?[0])
    }

    /// Consume a little-endian u16.
    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16, MirrorError> {
        Ok(u16::from_le_bytes(self.read_array(field)?))
    }

    /// Consume a little-endian u32.
    pub fn read_u32_le(&mut self, field: &'static str) -> Result<u32, MirrorError> {
        Ok(u32::from_le_bytes(self.read_array(field)?))
    }

    /// Consume a little-endian u64.
    pub fn read_u64_le(&mut self, field: &'static str) -> Result<u64, MirrorError> {
        Ok(u64::from_le_bytes(self.read_array(field)?))
    }

    /// Consume a canonical CompactSize integer.
    pub fn read_varint(&mut self, field: &'static str) -> Result<u64, MirrorError> {
        let prefix = self.read_u8(field)?;
        let (value, min) = match prefix {
            0xfd => (u64::from(self.read_u16_le(field)?), 0xfd),
            0xfe => (u64::from(self.read_u32_le(field)?), 0x1_0000),
            0xff => (self.read_u64_le(field)?, 0x1_0000_0000),
            small => return Ok(u64::from(small)),
        };
        if value < min {
            return Err(MirrorError::NonCanonicalVarInt { value, prefix });
        }
        Ok(value)
    }

    /// Fail unless every byte was consumed.
    pub fn finish(self) -> Result<(), MirrorError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(MirrorError::TrailingBytes { remaining }),
        }
    }
}

/// Append a CompactSize integer.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Encoded size of a CompactSize integer.
pub fn varint_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}
