use alloy_primitives::{Address, B256, Bytes, keccak256};
use serde::Serialize;

/// One event declaration from the contract ABI: name plus the ordered,
/// canonical parameter type strings (e.g. `uint256`, never `uint`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSignature {
    pub name: String,
    pub inputs: Vec<String>,
}

impl EventSignature {
    /// Canonical form `Name(type1,type2,...)`, the keccak preimage.
    pub fn canonical(&self) -> String {
        format!("{}({})", self.name, self.inputs.join(","))
    }

    /// Topic hash identifying this signature in log topic0 position.
    /// No type normalization is performed: a malformed type string yields
    /// a topic that will never match a real log.
    pub fn topic(&self) -> B256 {
        keccak256(self.canonical().as_bytes())
    }
}

/// Inclusive block range [from, to].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

/// A single on-chain log, reduced to the fields the audit needs.
/// Logs missing a topic0 are dropped before conversion and never
/// become records.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub topic: B256,
    pub block_number: u64,
    pub address: Address,
    pub data: Bytes,
}

/// Running count for one distinct topic observed in the range.
/// `matched_name` is set iff the topic is declared in the ABI.
#[derive(Debug, Clone, Serialize)]
pub struct TallyEntry {
    pub topic: B256,
    pub matched_name: Option<String>,
    pub count: u64,
}

/// Final outcome of a run. Built once after the last chunk is tallied,
/// read-only thereafter.
#[derive(Debug, Serialize)]
pub struct AuditResult {
    pub chain_id: u64,
    pub address: Address,
    pub block_range: BlockRange,
    pub total_logs: u64,
    pub tally: Vec<TallyEntry>,
    pub unknown_topics: Vec<B256>,
    pub required_events: Vec<String>,
    pub missing_required: Vec<String>,
}

impl AuditResult {
    /// Clean means nothing to flag: no topics outside the ABI and every
    /// required event observed at least once.
    pub fn is_clean(&self) -> bool {
        self.unknown_topics.is_empty() && self.missing_required.is_empty()
    }
}
