// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::byte_array::ByteArray;
use crate::encode::{put_string, put_u16, string_len};
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

/// PUBLISH: variable header (topic, packet-id when qos>0) then an opaque
/// payload filling the rest of the remaining length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublishPacket {
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    pub topic: String,
    pub packet_id: u16,
    pub payload: Vec<u8>,
}

impl PublishPacket {
    fn remaining_length(&self) -> usize {
        let mut len = string_len(&self.topic);
        if self.qos != QoS::AtMostOnce {
            len += 2;
        }
        len + self.payload.len()
    }

    /// # Errors
    /// Returns `EncodeError` if the topic exceeds the 16-bit length prefix.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::Publish,
            dup: self.dup,
            qos: self.qos,
            retain: self.retain,
            remaining_length: self.remaining_length(),
        };
        header.encode(buf)?;
        put_string(buf, &self.topic)?;
        if self.qos != QoS::AtMostOnce {
            put_u16(buf, self.packet_id);
        }
        buf.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Decodes the variable header and payload given an already-decoded
    /// fixed header (the dup/qos/retain bits and remaining length live
    /// there).
    ///
    /// # Errors
    /// Returns `ShortBuffer` if the topic, packet-id, or payload run past
    /// the declared remaining length.
    pub fn decode(ba: &mut ByteArray, header: &FixedHeader) -> Result<Self, DecodeError> {
        let body_start = ba.offset();
        let topic = ba.read_string()?;
        let packet_id = if header.qos != QoS::AtMostOnce {
            ba.read_u16()?
        } else {
            0
        };
        let consumed = ba.offset() - body_start;
        let payload_len = header
            .remaining_length
            .checked_sub(consumed)
            .ok_or(DecodeError::ShortBuffer)?;
        let payload = ba.read_bytes(payload_len)?.to_vec();
        Ok(Self {
            dup: header.dup,
            qos: header.qos,
            retain: header.retain,
            topic,
            packet_id,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_qos1() {
        let packet = PublishPacket {
            dup: false,
            qos: QoS::AtLeastOnce,
            retain: false,
            topic: "t".to_string(),
            packet_id: 7,
            payload: b"hi".to_vec(),
        };
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        let decoded = PublishPacket::decode(&mut ba, &header).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn round_trip_qos0_no_packet_id() {
        let packet = PublishPacket {
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            topic: "a/b".to_string(),
            packet_id: 0,
            payload: vec![],
        };
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        let decoded = PublishPacket::decode(&mut ba, &header).unwrap();
        assert_eq!(decoded, packet);
    }
}
