// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::byte_array::ByteArray;
use crate::encode::{put_string, put_u16, string_len};
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

/// UNSUBSCRIBE: packet-id then one or more topic filter strings until the
/// remaining length is exhausted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsubscribePacket {
    pub packet_id: u16,
    pub topics: Vec<String>,
}

impl UnsubscribePacket {
    fn remaining_length(&self) -> usize {
        2 + self.topics.iter().map(|t| string_len(t)).sum::<usize>()
    }

    /// # Errors
    /// Returns `EncodeError` if a topic name exceeds the 16-bit length
    /// prefix.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::Unsubscribe,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: self.remaining_length(),
        };
        header.encode(buf)?;
        put_u16(buf, self.packet_id);
        for topic in &self.topics {
            put_string(buf, topic)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns `ShortBuffer` if a topic runs past the declared remaining
    /// length.
    pub fn decode(ba: &mut ByteArray, header: &FixedHeader) -> Result<Self, DecodeError> {
        let body_start = ba.offset();
        let packet_id = ba.read_u16()?;
        let mut topics = Vec::new();
        while ba.offset() - body_start < header.remaining_length {
            topics.push(ba.read_string()?);
        }
        Ok(Self { packet_id, topics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_multiple_topics() {
        let packet = UnsubscribePacket {
            packet_id: 3,
            topics: vec!["a".to_string(), "b/c".to_string()],
        };
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(UnsubscribePacket::decode(&mut ba, &header).unwrap(), packet);
    }
}
