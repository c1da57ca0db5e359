// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

mod common;

use codec::{Packet, PingRequestPacket};

#[tokio::test]
async fn pingreq_gets_pingresp() {
    common::spawn_broker(18805).await;

    let mut stream = common::connect(18805).await;
    common::send(&mut stream, &common::connect_packet("pinger", true)).await;
    common::recv(&mut stream).await;

    common::send(&mut stream, &Packet::PingRequest(PingRequestPacket)).await;
    assert!(matches!(
        common::recv(&mut stream).await,
        Some(Packet::PingResponse(_))
    ));
}
