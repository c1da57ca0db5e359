// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use std::time::Duration;

use codec::{Packet, QoS, UnsubscribePacket};

#[tokio::test]
async fn unsubscribe_stops_further_delivery() {
    common::spawn_broker(18803).await;

    let mut publisher = common::connect(18803).await;
    common::send(&mut publisher, &common::connect_packet("pub", true)).await;
    common::recv(&mut publisher).await;

    let mut subscriber = common::connect(18803).await;
    common::send(&mut subscriber, &common::connect_packet("sub", true)).await;
    common::recv(&mut subscriber).await;
    common::send(
        &mut subscriber,
        &common::subscribe_packet(1, "weather", QoS::AtMostOnce),
    )
    .await;
    common::recv(&mut subscriber).await;

    common::send(
        &mut subscriber,
        &Packet::Unsubscribe(UnsubscribePacket {
            packet_id: 2,
            topics: vec!["weather".to_string()],
        }),
    )
    .await;
    assert!(matches!(
        common::recv(&mut subscriber).await,
        Some(Packet::UnsubscribeAck(_))
    ));

    common::send(
        &mut publisher,
        &common::publish_packet("weather", b"sunny", QoS::AtMostOnce, 0),
    )
    .await;

    let result =
        tokio::time::timeout(Duration::from_millis(300), common::recv(&mut subscriber)).await;
    assert!(
        result.is_err(),
        "subscriber should not receive after unsubscribing"
    );
}
