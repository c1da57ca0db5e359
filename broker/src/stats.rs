// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Broker-wide counters backing the `$SOL/...` statistics topics.

/// Number of seconds in a "SOL" — the original broker's uptime easter egg,
/// a made-up unit matching the scale of Martian sols.
pub const SOL_SECONDS: f64 = 88_775.24;

#[derive(Debug, Default)]
pub struct BrokerStats {
    pub clients_connected: u64,
    pub clients_disconnected: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
}

impl BrokerStats {
    #[must_use]
    pub fn currently_connected(&self) -> u64 {
        self.clients_connected
            .saturating_sub(self.clients_disconnected)
    }
}
