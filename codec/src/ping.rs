// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! PINGREQ and PINGRESP: fixed header only, no variable header or payload.

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::qos::QoS;

macro_rules! header_only {
    ($name:ident, $packet_type:expr) => {
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
        pub struct $name;

        impl $name {
            /// # Errors
            /// Never fails; present for symmetry with the other packet
            /// encoders.
            pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
                FixedHeader {
                    packet_type: $packet_type,
                    dup: false,
                    qos: QoS::AtMostOnce,
                    retain: false,
                    remaining_length: 0,
                }
                .encode(buf)
            }

            /// # Errors
            /// Never fails; present for symmetry with the other packet
            /// decoders.
            pub fn decode(_ba: &mut ByteArray) -> Result<Self, DecodeError> {
                Ok(Self)
            }
        }
    };
}

header_only!(PingRequestPacket, PacketType::PingRequest);
header_only!(PingResponsePacket, PacketType::PingResponse);
