// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! PUBACK, PUBREC, PUBREL, PUBCOMP and UNSUBACK all share the same wire
//! shape: a fixed header followed by a single packet-id.

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

macro_rules! packet_id_only {
    ($name:ident, $packet_type:expr) => {
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub struct $name {
            pub packet_id: u16,
        }

        impl $name {
            #[must_use]
            pub const fn new(packet_id: u16) -> Self {
                Self { packet_id }
            }

            /// # Errors
            /// Never fails; present for symmetry with the other packet
            /// encoders.
            pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
                let header = FixedHeader {
                    packet_type: $packet_type,
                    dup: false,
                    qos: QoS::AtMostOnce,
                    retain: false,
                    remaining_length: 2,
                };
                header.encode(buf)?;
                crate::encode::put_u16(buf, self.packet_id);
                Ok(())
            }

            /// # Errors
            /// Returns `ShortBuffer` if fewer than 2 bytes remain.
            pub fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
                Ok(Self {
                    packet_id: ba.read_u16()?,
                })
            }
        }
    };
}

packet_id_only!(PublishAckPacket, PacketType::PublishAck);
packet_id_only!(PublishReceivedPacket, PacketType::PublishReceived);
packet_id_only!(PublishReleasePacket, PacketType::PublishRelease);
packet_id_only!(PublishCompletePacket, PacketType::PublishComplete);
packet_id_only!(UnsubscribeAckPacket, PacketType::UnsubscribeAck);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puback_round_trip() {
        let packet = PublishAckPacket::new(42);
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        let _header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(PublishAckPacket::decode(&mut ba).unwrap(), packet);
    }
}
