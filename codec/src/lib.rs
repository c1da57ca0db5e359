// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Wire encoding and decoding for the MQTT v3.1.1 packet types a broker
//! needs. No I/O lives here; callers hand this crate byte slices and get
//! back typed packets, or vice versa.

mod ack;
mod byte_array;
mod connect;
mod connect_ack;
mod disconnect;
mod encode;
mod error;
mod header;
mod packet;
mod ping;
mod publish;
mod qos;
mod subscribe;
mod subscribe_ack;
mod unsubscribe;
mod var_int;

pub use ack::{
    PublishAckPacket, PublishCompletePacket, PublishReceivedPacket, PublishReleasePacket,
    UnsubscribeAckPacket,
};
pub use byte_array::ByteArray;
pub use connect::{ConnectFlags, ConnectPacket};
pub use connect_ack::{ConnectAckPacket, ConnectReturnCode};
pub use disconnect::DisconnectPacket;
pub use error::{DecodeError, EncodeError};
pub use header::{FixedHeader, PacketType};
pub use packet::Packet;
pub use ping::{PingRequestPacket, PingResponsePacket};
pub use publish::PublishPacket;
pub use qos::QoS;
pub use subscribe::{SubscribePacket, SubscribeTopic};
pub use subscribe_ack::{SubscribeAckPacket, SubscribeReturnCode};
pub use unsubscribe::UnsubscribePacket;
pub use var_int::VarInt;
