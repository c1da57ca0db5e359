// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use std::time::Duration;

use codec::{Packet, QoS};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use broker::config::{Config, SocketFamily};

#[tokio::test]
async fn unix_domain_socket_serves_connect_and_publish() {
    let path = "/tmp/sol-broker-test-08.sock".to_string();
    let _ = std::fs::remove_file(&path);

    let config = Config {
        hostname: path.clone(),
        socket_family: SocketFamily::Unix,
        stats_pub_interval: 1,
        ..Config::default()
    };
    common::spawn_broker_with_config(config).await;

    let mut subscriber = UnixStream::connect(&path).await.unwrap();
    send(&mut subscriber, &common::connect_packet("sub", true)).await;
    assert!(matches!(
        recv(&mut subscriber).await,
        Some(Packet::ConnectAck(_))
    ));
    send(
        &mut subscriber,
        &common::subscribe_packet(1, "weather", QoS::AtMostOnce),
    )
    .await;
    assert!(matches!(
        recv(&mut subscriber).await,
        Some(Packet::SubscribeAck(_))
    ));

    let mut publisher = UnixStream::connect(&path).await.unwrap();
    send(&mut publisher, &common::connect_packet("pub", true)).await;
    recv(&mut publisher).await;
    send(
        &mut publisher,
        &common::publish_packet("weather", b"sunny", QoS::AtMostOnce, 0),
    )
    .await;

    match tokio::time::timeout(Duration::from_millis(500), recv(&mut subscriber)).await {
        Ok(Some(Packet::Publish(publish))) => assert_eq!(publish.payload, b"sunny"),
        other => panic!("expected fanned-out PUBLISH over the unix socket, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

async fn send(stream: &mut UnixStream, packet: &Packet) {
    let mut buf = Vec::new();
    packet.encode(&mut buf).unwrap();
    stream.write_all(&buf).await.unwrap();
}

async fn recv(stream: &mut UnixStream) -> Option<Packet> {
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
