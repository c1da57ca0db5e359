// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};

use crate::error::DecodeError;

/// A read-only cursor over an MQTT packet body.
///
/// Every read advances `offset`; this is the single, consistent cursor
/// into the request buffer the codec relies on (never re-derive a pointer
/// mid-read, see spec.md §9 on `recv_packet`'s cursor bug).
pub struct ByteArray<'a> {
    offset: usize,
    data: &'a [u8],
}

impl<'a> ByteArray<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { offset: 0, data }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// # Errors
    /// Returns `ShortBuffer` if no byte remains.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// # Errors
    /// Returns `ShortBuffer` if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// # Errors
    /// Returns `ShortBuffer` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(DecodeError::ShortBuffer)?;
        if end > self.data.len() {
            return Err(DecodeError::ShortBuffer);
        }
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Reads a length-prefixed UTF-8 string field (two big-endian length
    /// bytes followed by that many bytes of UTF-8 data; no wire null
    /// terminator).
    ///
    /// # Errors
    /// Returns `ShortBuffer` if the length prefix or body run past the end
    /// of the buffer, or `InvalidUtf8` if the body is not valid UTF-8.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_err| DecodeError::InvalidUtf8)
    }

    /// Reads a length-prefixed binary field.
    ///
    /// # Errors
    /// Returns `ShortBuffer` if the length prefix or body run past the end
    /// of the buffer.
    pub fn read_binary(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_u16()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_byte_and_u16() {
        let buf = [0x01, 0x00, 0x10];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(ba.read_byte().unwrap(), 0x01);
        assert_eq!(ba.read_u16().unwrap(), 0x0010);
    }

    #[test]
    fn read_past_end_errors() {
        let buf = [0x01];
        let mut ba = ByteArray::new(&buf);
        ba.read_byte().unwrap();
        assert_eq!(ba.read_byte(), Err(DecodeError::ShortBuffer));
    }

    #[test]
    fn read_string_round_trip() {
        let buf = [0x00, 0x03, b'm', b'q', b't'];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(ba.read_string().unwrap(), "mqt");
    }

    #[test]
    fn read_string_invalid_utf8() {
        let buf = [0x00, 0x01, 0xff];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(ba.read_string(), Err(DecodeError::InvalidUtf8));
    }
}
