// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

/// CONNACK return codes, MQTT v3.1.1 §3.2.2.3.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectReturnCode {
    Accepted = 0,
    UnacceptableProtocolVersion = 1,
    IdentifierRejected = 2,
    ServerUnavailable = 3,
    BadUsernameOrPassword = 4,
    NotAuthorized = 5,
}

impl From<u8> for ConnectReturnCode {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::UnacceptableProtocolVersion,
            2 => Self::IdentifierRejected,
            3 => Self::ServerUnavailable,
            4 => Self::BadUsernameOrPassword,
            5 => Self::NotAuthorized,
            _ => Self::Accepted,
        }
    }
}

/// CONNACK: session-present byte + return-code byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConnectAckPacket {
    pub session_present: bool,
    pub return_code: ConnectReturnCode,
}

impl ConnectAckPacket {
    /// # Errors
    /// Never fails; present for symmetry with the other packet encoders.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::ConnectAck,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: 2,
        };
        header.encode(buf)?;
        buf.push(u8::from(self.session_present));
        buf.push(self.return_code as u8);
        Ok(())
    }

    /// # Errors
    /// Returns `ShortBuffer` if fewer than 2 bytes remain.
    pub fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let flags = ba.read_byte()?;
        let return_code = ConnectReturnCode::from(ba.read_byte()?);
        Ok(Self {
            session_present: flags & 0x01 != 0,
            return_code,
        })
    }
}
