use std::collections::HashMap;

use alloy_primitives::B256;
use tracing::debug;

use crate::models::common::EventSignature;
use crate::models::errors::ConfigError;

/// Topic → declared event signature, the classification table for
/// incoming logs. Built once per run from the loaded ABI.
#[derive(Debug, Default)]
pub struct TopicMap {
    entries: HashMap<B256, EventSignature>,
}

impl TopicMap {
    /// Two distinct signatures hashing to the same topic would silently
    /// misattribute logs, so a collision (including a duplicated ABI
    /// entry) is rejected outright.
    pub fn build(events: &[EventSignature]) -> Result<Self, ConfigError> {
        let mut entries = HashMap::with_capacity(events.len());
        for event in events {
            let topic = event.topic();
            debug!("Expected topic {} = {}", topic, event.canonical());
            if let Some(existing) = entries.insert(topic, event.clone()) {
                return Err(ConfigError::TopicCollision {
                    topic,
                    first: existing.canonical(),
                    second: event.canonical(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, topic: &B256) -> Option<&EventSignature> {
        self.entries.get(topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
