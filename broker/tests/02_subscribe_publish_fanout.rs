// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use codec::{Packet, QoS};

#[tokio::test]
async fn publish_fans_out_to_subscribers() {
    common::spawn_broker(18802).await;

    let mut publisher = common::connect(18802).await;
    common::send(&mut publisher, &common::connect_packet("pub", true)).await;
    assert!(matches!(
        common::recv(&mut publisher).await,
        Some(Packet::ConnectAck(_))
    ));

    let mut subscriber = common::connect(18802).await;
    common::send(&mut subscriber, &common::connect_packet("sub", true)).await;
    assert!(matches!(
        common::recv(&mut subscriber).await,
        Some(Packet::ConnectAck(_))
    ));
    common::send(
        &mut subscriber,
        &common::subscribe_packet(1, "weather", QoS::AtMostOnce),
    )
    .await;
    assert!(matches!(
        common::recv(&mut subscriber).await,
        Some(Packet::SubscribeAck(_))
    ));

    common::send(
        &mut publisher,
        &common::publish_packet("weather", b"sunny", QoS::AtMostOnce, 0),
    )
    .await;

    match common::recv(&mut subscriber).await {
        Some(Packet::Publish(publish)) => {
            assert_eq!(publish.topic, "weather");
            assert_eq!(publish.payload, b"sunny");
        }
        other => panic!("expected fanned-out PUBLISH, got {other:?}"),
    }
}
