// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, watch};

use crate::types::ClientId;

/// Tracks which topics a client subscribed to with `cleansession = false`.
/// Dropped on a cleansession connect.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub subscriptions: HashSet<String>,
}

/// Everything the dispatcher needs to reach a connected client: the sender
/// half of its outbound byte channel, and a flag the dispatcher flips to
/// tell a displaced connection task to close itself.
pub struct ClientHandle {
    pub outbound: mpsc::Sender<Vec<u8>>,
    pub displace: watch::Sender<bool>,
    pub session: Session,
    pub clean_session: bool,
}

/// `client_id -> ClientHandle`. Every Subscriber in the topic index
/// references a key in this map.
#[derive(Default)]
pub struct SessionRegistry {
    clients: HashMap<ClientId, ClientHandle>,
}

impl SessionRegistry {
    pub fn insert(&mut self, client_id: ClientId, handle: ClientHandle) -> Option<ClientHandle> {
        self.clients.insert(client_id, handle)
    }

    #[must_use]
    pub fn get(&self, client_id: &str) -> Option<&ClientHandle> {
        self.clients.get(client_id)
    }

    pub fn get_mut(&mut self, client_id: &str) -> Option<&mut ClientHandle> {
        self.clients.get_mut(client_id)
    }

    pub fn remove(&mut self, client_id: &str) -> Option<ClientHandle> {
        self.clients.remove(client_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
