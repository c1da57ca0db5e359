// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use std::time::Duration;

use codec::{Packet, QoS};

#[tokio::test]
async fn stats_are_published_within_one_and_a_half_intervals() {
    common::spawn_broker(18806).await;

    let mut subscriber = common::connect(18806).await;
    common::send(&mut subscriber, &common::connect_packet("watcher", true)).await;
    common::recv(&mut subscriber).await;
    common::send(
        &mut subscriber,
        &common::subscribe_packet(1, "$SOL/broker/uptime/", QoS::AtMostOnce),
    )
    .await;
    common::recv(&mut subscriber).await;

    let result =
        tokio::time::timeout(Duration::from_millis(1500), common::recv(&mut subscriber)).await;
    match result {
        Ok(Some(Packet::Publish(publish))) => {
            assert_eq!(publish.topic, "$SOL/broker/uptime/");
        }
        other => panic!("expected a stats PUBLISH within 1.5s, got {other:?}"),
    }
}
