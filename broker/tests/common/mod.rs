// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Shared across the numbered scenario test files; each one only uses a
//! subset, hence the blanket allow.
#![allow(dead_code)]

use std::time::Duration;

use codec::{Packet, QoS};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use broker::config::Config;
use broker::server::run_server;

/// Starts a broker on `port` as a background task and gives the listener
/// a moment to bind before returning.
pub async fn spawn_broker(port: u16) {
    let config = Config {
        hostname: "127.0.0.1".to_string(),
        port,
        stats_pub_interval: 1,
        ..Config::default()
    };
    spawn_broker_with_config(config).await;
}

pub async fn spawn_broker_with_config(config: Config) {
    tokio::spawn(run_server(config));
    tokio::time::sleep(Duration::from_millis(100)).await;
}

pub async fn connect(port: u16) -> TcpStream {
    TcpStream::connect(("127.0.0.1", port)).await.unwrap()
}

pub async fn send(stream: &mut TcpStream, packet: &Packet) {
    let mut buf = Vec::new();
    packet.encode(&mut buf).unwrap();
    stream.write_all(&buf).await.unwrap();
}

/// Reads exactly one framed packet off the stream, the same way the
/// broker's own connection task does.
pub async fn recv(stream: &mut TcpStream) -> Option<Packet> {
    let mut header = [0u8; 1];
    if stream.read_exact(&mut header).await.is_err() {
        return None;
    }
    let mut frame = vec![header[0]];
    loop {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).await.unwrap();
        frame.push(byte[0]);
        if byte[0] & 0x80 == 0 {
            break;
        }
    }
    let mut multiplier = 1usize;
    let mut value = 0usize;
    for byte in &frame[1..] {
        value += usize::from(byte & 0x7f) * multiplier;
        multiplier *= 128;
    }
    let mut body = vec![0u8; value];
    stream.read_exact(&mut body).await.unwrap();
    frame.extend_from_slice(&body);
    Packet::decode(&frame).unwrap().map(|(packet, _)| packet)
}

pub fn connect_packet(client_id: &str, clean_session: bool) -> Packet {
    Packet::Connect(codec::ConnectPacket {
        protocol_level: 4,
        flags: codec::ConnectFlags {
            clean_session,
            ..Default::default()
        },
        keep_alive: 60,
        client_id: client_id.to_string(),
        will_topic: None,
        will_message: Vec::new(),
        username: None,
        password: None,
    })
}

pub fn subscribe_packet(packet_id: u16, topic: &str, qos: QoS) -> Packet {
    Packet::Subscribe(codec::SubscribePacket {
        packet_id,
        topics: vec![codec::SubscribeTopic {
            topic: topic.to_string(),
            qos,
        }],
    })
}

pub fn publish_packet(topic: &str, payload: &[u8], qos: QoS, packet_id: u16) -> Packet {
    Packet::Publish(codec::PublishPacket {
        dup: false,
        qos,
        retain: false,
        topic: topic.to_string(),
        packet_id,
        payload: payload.to_vec(),
    })
}
