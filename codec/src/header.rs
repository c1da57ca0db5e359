// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::convert::TryFrom;

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::qos::QoS;
use crate::var_int::VarInt;

/// Wire values of the fixed header type nibble.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PacketType {
    Connect = 1,
    ConnectAck = 2,
    Publish = 3,
    PublishAck = 4,
    PublishReceived = 5,
    PublishRelease = 6,
    PublishComplete = 7,
    Subscribe = 8,
    SubscribeAck = 9,
    Unsubscribe = 10,
    UnsubscribeAck = 11,
    PingRequest = 12,
    PingResponse = 13,
    Disconnect = 14,
}

impl TryFrom<u8> for PacketType {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Connect),
            2 => Ok(Self::ConnectAck),
            3 => Ok(Self::Publish),
            4 => Ok(Self::PublishAck),
            5 => Ok(Self::PublishReceived),
            6 => Ok(Self::PublishRelease),
            7 => Ok(Self::PublishComplete),
            8 => Ok(Self::Subscribe),
            9 => Ok(Self::SubscribeAck),
            10 => Ok(Self::Unsubscribe),
            11 => Ok(Self::UnsubscribeAck),
            12 => Ok(Self::PingRequest),
            13 => Ok(Self::PingResponse),
            14 => Ok(Self::Disconnect),
            _ => Err(DecodeError::UnknownType),
        }
    }
}

/// Flag bits mandated for packet types that don't carry the PUBLISH
/// dup/qos/retain bits. MQTT-2.2.2-1 requires these reserved bits be
/// exactly these values or the receiver must close the connection.
const fn required_flags(packet_type: PacketType) -> Option<u8> {
    match packet_type {
        PacketType::PublishRelease | PacketType::Subscribe | PacketType::Unsubscribe => {
            Some(0b0010)
        }
        PacketType::Publish => None,
        _ => Some(0b0000),
    }
}

/// One byte: `type:4 | dup:1 | qos:2 | retain:1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedHeader {
    pub packet_type: PacketType,
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    pub remaining_length: usize,
}

impl FixedHeader {
    /// # Errors
    /// Returns `UnknownType` for an unrecognized type nibble, `BadFlags`
    /// if the flag bits don't match what's mandated for this packet type,
    /// or `MalformedLength` if the remaining-length varint overflows 4
    /// bytes.
    pub fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let byte = ba.read_byte()?;
        let packet_type = PacketType::try_from(byte >> 4)?;
        let flags = byte & 0x0f;

        let (dup, qos, retain) = if packet_type == PacketType::Publish {
            let qos = QoS::try_from((flags >> 1) & 0b11)?;
            (flags & 0b1000 != 0, qos, flags & 0b0001 != 0)
        } else {
            match required_flags(packet_type) {
                Some(required) if flags == required => (false, QoS::AtMostOnce, false),
                _ => return Err(DecodeError::BadFlags),
            }
        };

        let remaining_length = VarInt::decode(ba)?.value();
        Ok(Self {
            packet_type,
            dup,
            qos,
            retain,
            remaining_length,
        })
    }

    /// # Errors
    /// Returns `InvalidVarInt` if `remaining_length` exceeds the 4-byte
    /// `VarInt` limit.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let type_bits = (self.packet_type as u8) << 4;
        let flags = if self.packet_type == PacketType::Publish {
            let dup = u8::from(self.dup) << 3;
            let qos = (self.qos as u8) << 1;
            let retain = u8::from(self.retain);
            dup | qos | retain
        } else {
            required_flags(self.packet_type).unwrap_or(0)
        };
        buf.push(type_bits | flags);
        VarInt::new(self.remaining_length)?.encode(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_publish_flags() {
        let buf = [0b0011_1011, 0x00];
        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(header.packet_type, PacketType::Publish);
        assert!(header.dup);
        assert_eq!(header.qos, QoS::AtLeastOnce);
        assert!(header.retain);
    }

    #[test]
    fn bad_flags_on_connect_rejected() {
        let buf = [0b0001_0001, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(FixedHeader::decode(&mut ba), Err(DecodeError::BadFlags));
    }

    #[test]
    fn encode_decode_round_trip() {
        let header = FixedHeader {
            packet_type: PacketType::PingRequest,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: 0,
        };
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0xc0, 0x00]);
    }
}
