// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::collections::HashMap;

use codec::QoS;

use crate::types::ClientId;

/// A non-owning handle to a connected client: subscriber entries never
/// share ownership with the session registry, only the client id.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub client_id: ClientId,
    pub qos: QoS,
}

#[derive(Debug, Default, Clone)]
pub struct Topic {
    pub name: String,
    pub subscribers: Vec<Subscriber>,
}

/// Keyed by literal topic name; no wildcard matching.
#[derive(Default)]
pub struct TopicIndex {
    topics: HashMap<String, Topic>,
}

impl TopicIndex {
    pub fn get_or_create(&mut self, name: &str) -> &mut Topic {
        self.topics
            .entry(name.to_string())
            .or_insert_with(|| Topic {
                name: name.to_string(),
                subscribers: Vec::new(),
            })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.get(name)
    }

    pub fn subscribe(&mut self, name: &str, client_id: ClientId, qos: QoS) {
        let topic = self.get_or_create(name);
        if let Some(sub) = topic
            .subscribers
            .iter_mut()
            .find(|sub| sub.client_id == client_id)
        {
            sub.qos = qos;
        } else {
            topic.subscribers.push(Subscriber { client_id, qos });
        }
    }

    pub fn unsubscribe(&mut self, name: &str, client_id: &str) {
        if let Some(topic) = self.topics.get_mut(name) {
            topic.subscribers.retain(|sub| sub.client_id != client_id);
        }
    }

    /// Removes every subscriber entry referencing `client_id`, across all
    /// topics. Must run before the client record itself is dropped.
    pub fn remove_subscriber_everywhere(&mut self, client_id: &str) {
        for topic in self.topics.values_mut() {
            topic.subscribers.retain(|sub| sub.client_id != client_id);
        }
    }
}
