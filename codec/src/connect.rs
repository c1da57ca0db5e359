// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::convert::TryFrom;

use crate::byte_array::ByteArray;
use crate::encode::{binary_len, put_binary, put_string, put_u16, string_len};
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

const PROTOCOL_NAME: &str = "MQTT";

/// Connect flags byte: `username:1 | password:1 | willretain:1 | willqos:2 | will:1 | cleansession:1 | reserved:1`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConnectFlags {
    pub has_username: bool,
    pub has_password: bool,
    pub will_retain: bool,
    pub will_qos: QoS,
    pub will: bool,
    pub clean_session: bool,
}

impl ConnectFlags {
    fn decode(byte: u8) -> Result<Self, DecodeError> {
        if byte & 0b0000_0001 != 0 {
            // Reserved bit must be zero.
            return Err(DecodeError::BadFlags);
        }
        let will = byte & 0b0000_0100 != 0;
        let will_qos = QoS::try_from((byte >> 3) & 0b11)?;
        let will_retain = byte & 0b0010_0000 != 0;
        if !will && (will_qos != QoS::AtMostOnce || will_retain) {
            return Err(DecodeError::BadFlags);
        }
        let has_password = byte & 0b0100_0000 != 0;
        let has_username = byte & 0b1000_0000 != 0;
        if !has_username && has_password {
            return Err(DecodeError::BadFlags);
        }
        Ok(Self {
            has_username,
            has_password,
            will_retain,
            will_qos,
            will,
            clean_session: byte & 0b0000_0010 != 0,
        })
    }

    fn encode(self) -> u8 {
        let mut byte = 0u8;
        byte |= u8::from(self.has_username) << 7;
        byte |= u8::from(self.has_password) << 6;
        byte |= u8::from(self.will_retain) << 5;
        byte |= (self.will_qos as u8) << 3;
        byte |= u8::from(self.will) << 2;
        byte |= u8::from(self.clean_session) << 1;
        byte
    }
}

/// CONNECT: the client's opening handshake packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectPacket {
    pub protocol_level: u8,
    pub flags: ConnectFlags,
    pub keep_alive: u16,
    pub client_id: String,
    pub will_topic: Option<String>,
    pub will_message: Vec<u8>,
    pub username: Option<String>,
    pub password: Option<Vec<u8>>,
}

impl ConnectPacket {
    fn remaining_length(&self) -> usize {
        let mut len = string_len(PROTOCOL_NAME) + 1 + 1 + 2 + string_len(&self.client_id);
        if self.flags.will {
            len += string_len(self.will_topic.as_deref().unwrap_or(""));
            len += binary_len(&self.will_message);
        }
        if let Some(username) = &self.username {
            len += string_len(username);
        }
        if let Some(password) = &self.password {
            len += binary_len(password);
        }
        len
    }

    /// # Errors
    /// Returns `EncodeError` if any field exceeds wire length limits.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let header = FixedHeader {
            packet_type: PacketType::Connect,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: self.remaining_length(),
        };
        header.encode(buf)?;
        put_string(buf, PROTOCOL_NAME)?;
        buf.push(self.protocol_level);
        buf.push(self.flags.encode());
        put_u16(buf, self.keep_alive);
        put_string(buf, &self.client_id)?;
        if self.flags.will {
            put_string(buf, self.will_topic.as_deref().unwrap_or(""))?;
            put_binary(buf, &self.will_message)?;
        }
        if let Some(username) = &self.username {
            put_string(buf, username)?;
        }
        if let Some(password) = &self.password {
            put_binary(buf, password)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns `DecodeError` if the buffer is short, the protocol name or
    /// level is invalid, or the connect flags violate MQTT-3.1.2 rules.
    pub fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let protocol_name = ba.read_string()?;
        if protocol_name != PROTOCOL_NAME {
            return Err(DecodeError::InvalidProtocolName);
        }
        let protocol_level = ba.read_byte()?;
        if !(3..=5).contains(&protocol_level) {
            return Err(DecodeError::InvalidProtocolLevel);
        }
        let flags = ConnectFlags::decode(ba.read_byte()?)?;
        let keep_alive = ba.read_u16()?;
        let client_id = ba.read_string()?;

        let (will_topic, will_message) = if flags.will {
            (Some(ba.read_string()?), ba.read_binary()?)
        } else {
            (None, Vec::new())
        };
        let username = if flags.has_username {
            Some(ba.read_string()?)
        } else {
            None
        };
        let password = if flags.has_password {
            Some(ba.read_binary()?)
        } else {
            None
        };

        Ok(Self {
            protocol_level,
            flags,
            keep_alive,
            client_id,
            will_topic,
            will_message,
            username,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_scenario_empty_client_id() {
        let mut buf = Vec::new();
        FixedHeader {
            packet_type: PacketType::Connect,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length: 12,
        }
        .encode(&mut buf)
        .unwrap();
        buf.extend_from_slice(&[0x00, 0x04]);
        buf.extend_from_slice(b"MQTT");
        buf.push(0x04);
        buf.push(0x02);
        buf.extend_from_slice(&[0x00, 0x3c]);
        buf.extend_from_slice(&[0x00, 0x00]);

        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(header.remaining_length, 12);
        let packet = ConnectPacket::decode(&mut ba).unwrap();
        assert!(packet.client_id.is_empty());
        assert!(packet.flags.clean_session);
    }

    #[test]
    fn encode_decode_round_trip_with_will_and_auth() {
        let packet = ConnectPacket {
            protocol_level: 4,
            flags: ConnectFlags {
                has_username: true,
                has_password: true,
                will_retain: false,
                will_qos: QoS::AtLeastOnce,
                will: true,
                clean_session: true,
            },
            keep_alive: 60,
            client_id: "abc".to_string(),
            will_topic: Some("last/will".to_string()),
            will_message: b"bye".to_vec(),
            username: Some("user".to_string()),
            password: Some(b"pass".to_vec()),
        };
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let mut ba = ByteArray::new(&buf);
        let header = FixedHeader::decode(&mut ba).unwrap();
        assert_eq!(header.remaining_length, ba.remaining());
        let decoded = ConnectPacket::decode(&mut ba).unwrap();
        assert_eq!(decoded, packet);
    }
}
