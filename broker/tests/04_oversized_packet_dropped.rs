// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use std::time::Duration;

use broker::config::Config;

#[tokio::test]
async fn packet_over_max_request_size_is_dropped_without_connack() {
    let config = Config {
        hostname: "127.0.0.1".to_string(),
        port: 18804,
        max_request_size: 16,
        ..Config::default()
    };
    common::spawn_broker_with_config(config).await;

    let mut stream = common::connect(18804).await;
    common::send(
        &mut stream,
        &common::connect_packet("a-client-id-longer-than-sixteen-bytes", true),
    )
    .await;

    let result = tokio::time::timeout(Duration::from_millis(300), common::recv(&mut stream)).await;
    match result {
        Err(_) => {}
        Ok(None) => {}
        Ok(Some(other)) => panic!("expected no CONNACK for oversized packet, got {other:?}"),
    }
}
