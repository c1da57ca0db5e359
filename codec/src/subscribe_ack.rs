// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::byte_array::ByteArray;
use crate::encode::put_u16;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

/// One SUBACK return-code byte: either the granted `QoS` or, on the high
/// bit, a failure for that topic filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubscribeReturnCode {
    Success(QoS),
    Failure,
}

impl SubscribeReturnCode {
    const fn to_byte(self) -> u8 {
        match self {
            Self::Success(qos) => qos as u8,
            Self::Failure => 0x80,
        }
    }

    const fn from_byte(byte: u8) -> Self {
        if byte & 0x80 != 0 {
            Self::Failure
        } else {
            match byte {
                1 => Self::Success(QoS::AtLeastOnce),
                2 => Self::Success(QoS::ExactlyOnce),
                _ => Self::Success(QoS::AtMostOnce),
            }
        }
    }
}

/// SUBACK: packet-id then one return-code byte per topic filter in the
/// originating SUBSCRIBE, in the same order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscribeAckPacket {
    pub packet_id: u16,
    pub return_codes: Vec<SubscribeReturnCode>,
}

impl SubscribeAckPacket {
    /// # Errors
    /// Returns `EncodeError` if the packet's remaining length exceeds the
    /// 4-byte `VarInt` limit.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::SubscribeAck,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: 2 + self.return_codes.len(),
        };
        header.encode(buf)?;
        put_u16(buf, self.packet_id);
        for code in &self.return_codes {
            buf.push(code.to_byte());
        }
        Ok(())
    }

    /// # Errors
    /// Returns `ShortBuffer` if a return-code byte runs past the declared
    /// remaining length.
    pub fn decode(ba: &mut ByteArray, header: &FixedHeader) -> Result<Self, DecodeError> {
        let packet_id = ba.read_u16()?;
        let count = header.remaining_length - 2;
        let mut return_codes = Vec::with_capacity(count);
        for _ in 0..count {
            return_codes.push(SubscribeReturnCode::from_byte(ba.read_byte()?));
        }
        Ok(Self {
            packet_id,
            return_codes,
        })
    }
}
