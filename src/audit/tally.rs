use std::collections::HashMap;

use alloy_primitives::B256;
use tracing::debug;

use crate::audit::topics::TopicMap;
use crate::models::common::{LogRecord, TallyEntry};

/// Streaming per-topic counter. Each record lands in exactly one entry;
/// aggregation is commutative, so chunk arrival order never affects the
/// final tally.
#[derive(Debug)]
pub struct EventTallier<'a> {
    topics: &'a TopicMap,
    entries: HashMap<B256, TallyEntry>,
    total: u64,
}

impl<'a> EventTallier<'a> {
    pub fn new(topics: &'a TopicMap) -> Self {
        Self {
            topics,
            entries: HashMap::new(),
            total: 0,
        }
    }

    pub fn ingest(&mut self, records: &[LogRecord]) {
        for record in records {
            self.record(record);
        }
    }

    fn record(&mut self, record: &LogRecord) {
        let matched_name = self.topics.get(&record.topic).map(|sig| sig.name.clone());
        let entry = self
            .entries
            .entry(record.topic)
            .or_insert_with(|| {
                if matched_name.is_none() {
                    debug!(
                        "Unknown topic {} first seen at block {} from {} ({} data bytes)",
                        record.topic,
                        record.block_number,
                        record.address,
                        record.data.len()
                    );
                }
                TallyEntry {
                    topic: record.topic,
                    matched_name,
                    count: 0,
                }
            });
        entry.count += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Final tally sorted by descending count (topic as tiebreaker for a
    /// stable report), plus the sorted list of topics absent from the ABI.
    pub fn finalize(self) -> (Vec<TallyEntry>, Vec<B256>) {
        let mut tally: Vec<TallyEntry> = self.entries.into_values().collect();
        tally.sort_by(|a, b| b.count.cmp(&a.count).then(a.topic.cmp(&b.topic)));

        let mut unknown: Vec<B256> = tally
            .iter()
            .filter(|entry| entry.matched_name.is_none())
            .map(|entry| entry.topic)
            .collect();
        unknown.sort();

        (tally, unknown)
    }
}

/// Required names with no observed occurrence: the set difference between
/// `required` and the matched names with count >= 1. Order follows the
/// required list. An empty requirement list yields an empty set.
pub fn missing_required(required: &[String], tally: &[TallyEntry]) -> Vec<String> {
    required
        .iter()
        .filter(|name| {
            !tally
                .iter()
                .any(|entry| entry.count >= 1 && entry.matched_name.as_deref() == Some(name.as_str()))
        })
        .cloned()
        .collect()
}
