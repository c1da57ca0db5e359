// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};

use crate::error::EncodeError;

/// Writes a length-prefixed UTF-8 string: two big-endian length bytes
/// followed by the string's bytes, no wire null terminator.
///
/// # Errors
/// Returns `TooLong` if `s` is longer than `u16::MAX` bytes.
pub fn put_string(buf: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    put_binary(buf, s.as_bytes())
}

/// Writes a length-prefixed binary field.
///
/// # Errors
/// Returns `TooLong` if `data` is longer than `u16::MAX` bytes.
pub fn put_binary(buf: &mut Vec<u8>, data: &[u8]) -> Result<(), EncodeError> {
    if data.len() > usize::from(u16::MAX) {
        return Err(EncodeError::TooLong);
    }
    #[allow(clippy::cast_possible_truncation)]
    put_u16(buf, data.len() as u16);
    buf.extend_from_slice(data);
    Ok(())
}

pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    let mut tmp = [0u8; 2];
    BigEndian::write_u16(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

/// Byte length a string will occupy on the wire, length prefix included.
#[must_use]
pub fn string_len(s: &str) -> usize {
    2 + s.len()
}

/// Byte length a binary field will occupy on the wire, length prefix
/// included.
#[must_use]
pub fn binary_len(data: &[u8]) -> usize {
    2 + data.len()
}
