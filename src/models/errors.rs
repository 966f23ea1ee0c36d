use std::path::PathBuf;

use alloy_primitives::B256;
use alloy_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("ABI document must be a JSON array of interface entries")]
    AbiNotArray,
    #[error("ABI event entry #{index} has no name")]
    EventMissingName { index: usize },
    #[error("required-events document must be a JSON array of strings")]
    RequiredEventsNotStrings,
    #[error("invalid contract address '{input}'")]
    InvalidAddress { input: String },
    #[error("invalid RPC URL '{input}': {source}")]
    InvalidRpcUrl {
        input: String,
        source: url::ParseError,
    },
    #[error("invalid block range: from-block {from} > to-block {to}")]
    InvalidBlockRange { from: u64, to: u64 },
    #[error("topic collision on {topic}: '{first}' and '{second}' hash to the same topic")]
    TopicCollision {
        topic: B256,
        first: String,
        second: String,
    },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch {what}: {source}")]
    ChainMetadata {
        what: &'static str,
        source: TransportError,
    },
    #[error("log query for blocks [{from}, {to}] failed with a non-retryable error: {source}")]
    Chunk {
        from: u64,
        to: u64,
        source: TransportError,
    },
    #[error("log query for blocks [{from}, {to}] still failing after {attempts} attempts: {source}")]
    ChunkExhausted {
        from: u64,
        to: u64,
        attempts: u32,
        source: TransportError,
    },
}

/// Operational failures only. Audit findings (unknown topics, missing
/// required events) are reported through `AuditResult`, never through
/// this type.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}
