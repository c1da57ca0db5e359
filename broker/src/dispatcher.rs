// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! The dispatcher actor: a single Tokio task owning the topic index,
//! session registry and stats counters. All mutations of that state are
//! serialized through its mailbox, replacing the locks a multi-threaded
//! design would otherwise need.

use std::time::Instant;

use tokio::sync::mpsc;

use codec::{
    ConnectAckPacket, ConnectReturnCode, PublishPacket, QoS, SubscribeAckPacket,
    SubscribeReturnCode, UnsubscribeAckPacket,
};

use crate::commands::{
    ConnectRequest, DisconnectRequest, DispatcherCmd, PublishRequest, SubscribeRequest,
    UnsubscribeRequest,
};
use crate::session::{ClientHandle, Session, SessionRegistry};
use crate::stats::{BrokerStats, SOL_SECONDS};
use crate::topic::TopicIndex;

/// Topics seeded at startup, mirroring the fourteen `$SOL/...` names the
/// original broker creates up front so a subscriber can attach before the
/// first value is ever published.
const SEEDED_TOPICS: [&str; 14] = [
    "$SOL/",
    "$SOL/broker/",
    "$SOL/broker/clients/",
    "$SOL/broker/bytes/",
    "$SOL/broker/messages/",
    "$SOL/broker/uptime/",
    "$SOL/broker/uptime/sol",
    "$SOL/broker/clients/connected/",
    "$SOL/broker/clients/disconnected/",
    "$SOL/broker/bytes/sent/",
    "$SOL/broker/bytes/received/",
    "$SOL/broker/messages/sent/",
    "$SOL/broker/messages/received/",
    "$SOL/broker/memory/used",
];

pub struct Dispatcher {
    receiver: mpsc::Receiver<DispatcherCmd>,
    topics: TopicIndex,
    sessions: SessionRegistry,
    stats: BrokerStats,
    start: Instant,
    max_memory: u64,
}

impl Dispatcher {
    #[must_use]
    pub fn new(receiver: mpsc::Receiver<DispatcherCmd>, max_memory: u64) -> Self {
        let mut topics = TopicIndex::default();
        for name in SEEDED_TOPICS {
            topics.get_or_create(name);
        }
        Self {
            receiver,
            topics,
            sessions: SessionRegistry::default(),
            stats: BrokerStats::default(),
            start: Instant::now(),
            max_memory,
        }
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                DispatcherCmd::Connect(req) => self.handle_connect(req).await,
                DispatcherCmd::Subscribe(req) => self.handle_subscribe(req),
                DispatcherCmd::Unsubscribe(req) => self.handle_unsubscribe(req),
                DispatcherCmd::Publish(req) => self.handle_publish(req).await,
                DispatcherCmd::Disconnect(req) => self.handle_disconnect(req),
                DispatcherCmd::PublishStats => self.handle_publish_stats().await,
            }
        }
    }

    async fn handle_connect(&mut self, req: ConnectRequest) {
        let ConnectRequest {
            client_id,
            clean_session,
            outbound,
            displace,
            reply,
        } = req;

        if client_id.is_empty() && !clean_session {
            let _ = reply.send(ConnectAckPacket {
                session_present: false,
                return_code: ConnectReturnCode::IdentifierRejected,
            });
            return;
        }

        if let Some(prior) = self.sessions.remove(&client_id) {
            log::info!("connect: displacing prior session for client {client_id}");
            let _ = prior.displace.send(true);
            self.topics.remove_subscriber_everywhere(&client_id);
        } else {
            self.stats.clients_connected += 1;
        }

        self.sessions.insert(
            client_id,
            ClientHandle {
                outbound,
                displace,
                session: Session::default(),
                clean_session,
            },
        );
        let _ = reply.send(ConnectAckPacket {
            session_present: false,
            return_code: ConnectReturnCode::Accepted,
        });
    }

    fn handle_subscribe(&mut self, req: SubscribeRequest) {
        let SubscribeRequest {
            client_id,
            packet_id,
            topics,
            reply,
        } = req;

        let mut return_codes = Vec::with_capacity(topics.len());
        for topic in &topics {
            self.topics
                .subscribe(&topic.topic, client_id.clone(), topic.qos);
            if let Some(handle) = self.sessions.get_mut(&client_id) {
                handle.session.subscriptions.insert(topic.topic.clone());
            }
            return_codes.push(SubscribeReturnCode::Success(topic.qos));
        }
        let _ = reply.send(SubscribeAckPacket {
            packet_id,
            return_codes,
        });
    }

    fn handle_unsubscribe(&mut self, req: UnsubscribeRequest) {
        let UnsubscribeRequest {
            client_id,
            packet_id,
            topics,
            reply,
        } = req;

        for topic in &topics {
            self.topics.unsubscribe(topic, &client_id);
            if let Some(handle) = self.sessions.get_mut(&client_id) {
                handle.session.subscriptions.remove(topic);
            }
        }
        let _ = reply.send(UnsubscribeAckPacket { packet_id });
    }

    async fn handle_publish(&mut self, req: PublishRequest) {
        self.stats.messages_received += 1;
        self.stats.bytes_received += req.packet.payload.len() as u64;
        self.fan_out(&req.packet).await;
    }

    fn handle_disconnect(&mut self, req: DisconnectRequest) {
        if let Some(handle) = self.sessions.remove(&req.client_id) {
            if handle.clean_session {
                self.topics.remove_subscriber_everywhere(&req.client_id);
            }
            self.stats.clients_disconnected += 1;
        }
    }

    /// Builds one PUBLISH per subscriber of `packet.topic`, with QoS
    /// downgraded to `min(publisher_qos, subscriber_qos)`, and sends the
    /// encoded bytes over that subscriber's outbound channel. A send
    /// failure (full channel, subscriber gone) is logged and skipped —
    /// there is no per-subscriber outbox to retry into.
    async fn fan_out(&mut self, packet: &PublishPacket) {
        let Some(topic) = self.topics.get(&packet.topic) else {
            return;
        };
        let subscribers = topic.subscribers.clone();
        for sub in subscribers {
            let Some(handle) = self.sessions.get(&sub.client_id) else {
                continue;
            };
            let qos = packet.qos.min(sub.qos);
            let out = PublishPacket {
                dup: false,
                qos,
                retain: false,
                topic: packet.topic.clone(),
                packet_id: if qos == QoS::AtMostOnce {
                    0
                } else {
                    packet.packet_id
                },
                payload: packet.payload.clone(),
            };
            let mut buf = Vec::new();
            if let Err(err) = out.encode(&mut buf) {
                log::error!("dispatcher: failed to encode fan-out publish: {err:?}");
                continue;
            }
            let len = buf.len() as u64;
            if handle.outbound.send(buf).await.is_err() {
                log::warn!(
                    "dispatcher: fan-out send failed for client {}",
                    sub.client_id
                );
                continue;
            }
            self.stats.bytes_sent += len;
            self.stats.messages_sent += 1;
        }
    }

    /// Synthesizes QoS-0 PUBLISH packets for the statistics the original
    /// broker refreshes on the timer tick, plus `memory/used` (this crate's
    /// own addition — the original never enforces `max_memory`, so this
    /// just reports the configured bound rather than live usage). The
    /// remaining seeded topics exist so a SUBSCRIBE succeeds against them
    /// but carry no periodic value.
    async fn handle_publish_stats(&mut self) {
        let uptime = self.start.elapsed().as_secs();
        let sol_uptime = uptime as f64 / SOL_SECONDS;

        let values = [
            ("$SOL/broker/uptime/", uptime.to_string()),
            ("$SOL/broker/uptime/sol", format!("{sol_uptime:.4}")),
            (
                "$SOL/broker/clients/connected/",
                self.stats.currently_connected().to_string(),
            ),
            ("$SOL/broker/bytes/sent/", self.stats.bytes_sent.to_string()),
            (
                "$SOL/broker/messages/sent/",
                self.stats.messages_sent.to_string(),
            ),
            (
                "$SOL/broker/messages/received/",
                self.stats.messages_received.to_string(),
            ),
            ("$SOL/broker/memory/used", self.max_memory.to_string()),
        ];

        for (topic, value) in values {
            let packet = PublishPacket {
                dup: false,
                qos: QoS::AtMostOnce,
                retain: false,
                topic: topic.to_string(),
                packet_id: 0,
                payload: value.into_bytes(),
            };
            self.fan_out(&packet).await;
        }
    }
}
