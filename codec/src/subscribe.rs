// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::byte_array::ByteArray;
use crate::encode::{put_string, put_u16, string_len};
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscribeTopic {
    pub topic: String,
    pub qos: QoS,
}

/// SUBSCRIBE: packet-id then one or more `(topic, qos)` tuples until the
/// remaining length is exhausted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscribePacket {
    pub packet_id: u16,
    pub topics: Vec<SubscribeTopic>,
}

impl SubscribePacket {
    fn remaining_length(&self) -> usize {
        2 + self
            .topics
            .iter()
            .map(|t| string_len(&t.topic) + 1)
            .sum::<usize>()
    }

    /// # Errors
    /// Returns `EncodeError` if a topic name exceeds the 16-bit length
    /// prefix.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::Subscribe,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: self.remaining_length(),
        };
        header.encode(buf)?;
        put_u16(buf, self.packet_id);
        for topic in &self.topics {
            put_string(buf, &topic.topic)?;
            buf.push(topic.qos as u8);
        }
        Ok(())
    }

    /// Decrements the declared remaining length by the full tuple size
    /// (`2 + topic_len + 1`) on every iteration — spec.md §9 flags the
    /// original C implementation for decrementing only by the topic-length
    /// field and desynchronizing the cursor.
    ///
    /// # Errors
    /// Returns `ShortBuffer` if a tuple runs past the declared remaining
    /// length.
    pub fn decode(ba: &mut ByteArray, header: &FixedHeader) -> Result<Self, DecodeError> {
        let body_start = ba.offset();
        let packet_id = ba.read_u16()?;
        let mut topics = Vec::new();
        while ba.offset() - body_start < header.remaining_length {
            let topic = ba.read_string()?;
            let qos = QoS::try_from(ba.read_byte()?)?;
            topics.push(SubscribeTopic { topic, qos });
        }
        Ok(Self { packet_id, topics })
    }
}
