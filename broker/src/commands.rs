// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Mailbox messages sent from connection tasks (and the stats timer) to
//! the dispatcher actor. The dispatcher is the single owner of the topic
//! index, session registry and stats counters; every mutation of that
//! state goes through one of these.

use tokio::sync::{mpsc, oneshot, watch};

use codec::{
    ConnectAckPacket, PublishPacket, SubscribeAckPacket, SubscribeTopic, UnsubscribeAckPacket,
};

use crate::types::ClientId;

pub struct ConnectRequest {
    pub client_id: ClientId,
    pub clean_session: bool,
    pub outbound: mpsc::Sender<Vec<u8>>,
    pub displace: watch::Sender<bool>,
    pub reply: oneshot::Sender<ConnectAckPacket>,
}

pub struct SubscribeRequest {
    pub client_id: ClientId,
    pub packet_id: u16,
    pub topics: Vec<SubscribeTopic>,
    pub reply: oneshot::Sender<SubscribeAckPacket>,
}

pub struct UnsubscribeRequest {
    pub client_id: ClientId,
    pub packet_id: u16,
    pub topics: Vec<String>,
    pub reply: oneshot::Sender<UnsubscribeAckPacket>,
}

pub struct PublishRequest {
    pub packet: PublishPacket,
}

pub struct DisconnectRequest {
    pub client_id: ClientId,
}

pub enum DispatcherCmd {
    Connect(ConnectRequest),
    Subscribe(SubscribeRequest),
    Unsubscribe(UnsubscribeRequest),
    Publish(PublishRequest),
    Disconnect(DisconnectRequest),
    PublishStats,
}
