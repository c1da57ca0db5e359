// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! DISCONNECT: fixed header only, no variable header or payload.

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DisconnectPacket;

impl DisconnectPacket {
    /// # Errors
    /// Never fails; present for symmetry with the other packet encoders.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        FixedHeader {
            packet_type: PacketType::Disconnect,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: 0,
        }
        .encode(buf)
    }

    /// # Errors
    /// Never fails; present for symmetry with the other packet decoders.
    pub fn decode(_ba: &mut ByteArray) -> Result<Self, DecodeError> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut buf = Vec::new();
        DisconnectPacket.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(header.packet_type, PacketType::Disconnect);
        DisconnectPacket::decode(&mut ba).unwrap();
    }
}
