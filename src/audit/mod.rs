pub mod rpc;
pub mod tally;
pub mod topics;

use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::Provider;
use tracing::{debug, info};

use crate::audit::tally::EventTallier;
use crate::audit::topics::TopicMap;
use crate::models::common::{AuditResult, BlockRange};
use crate::models::errors::{AuditError, ConfigError};
use crate::utils::retry::RetryConfig;

/// Blocks audited below the chain head when no explicit range is given.
pub const DEFAULT_LOOKBACK: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct AuditParams {
    pub address: Address,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    pub step: u64,
    pub required_events: Vec<String>,
}

/// Split the inclusive range [from, to] into consecutive chunks of width
/// <= step, the last one truncated to fit. Every block appears in exactly
/// one chunk.
pub fn chunk_ranges(from: u64, to: u64, step: u64) -> Vec<BlockRange> {
    let step = step.max(1);
    let mut ranges = Vec::new();
    let mut cursor = from;
    while cursor <= to {
        let end = cursor.saturating_add(step - 1).min(to);
        ranges.push(BlockRange { from: cursor, to: end });
        if end == u64::MAX {
            break;
        }
        cursor = end + 1;
    }
    ranges
}

/// Resolve the audited range against the chain head, once per run.
/// Unset bounds default to the most recent DEFAULT_LOOKBACK blocks.
pub fn resolve_range(
    from_block: Option<u64>,
    to_block: Option<u64>,
    head: u64,
) -> Result<BlockRange, ConfigError> {
    let from = from_block.unwrap_or_else(|| head.saturating_sub(DEFAULT_LOOKBACK));
    let to = to_block.unwrap_or(head);
    if from > to {
        return Err(ConfigError::InvalidBlockRange { from, to });
    }
    Ok(BlockRange { from, to })
}

/// The whole pipeline: resolve chain metadata and range, fetch logs chunk
/// by chunk, tally, and cross-check requirements. Any chunk failure aborts
/// the run; a partial tally could falsely clear a missing required event.
pub async fn run<P>(
    provider: &P,
    params: &AuditParams,
    topics: &TopicMap,
) -> Result<AuditResult, AuditError>
where
    P: Provider<AnyNetwork>,
{
    let retry_config = RetryConfig::default();

    let chain_id = rpc::get_chain_id(provider, &retry_config).await?;
    info!("Chain ID: {}", chain_id);

    let head = rpc::get_latest_block_number(provider, &retry_config).await?;
    let range = resolve_range(params.from_block, params.to_block, head)?;
    info!(
        "Auditing {} over blocks [{}, {}] (head {}, step {})",
        params.address, range.from, range.to, head, params.step
    );

    let mut tallier = EventTallier::new(topics);
    for chunk in chunk_ranges(range.from, range.to, params.step) {
        let records =
            rpc::get_logs_chunk(provider, params.address, chunk.from, chunk.to, &retry_config)
                .await?;
        debug!(
            "Blocks [{}, {}]: {} logs ({} total so far)",
            chunk.from,
            chunk.to,
            records.len(),
            tallier.total() + records.len() as u64
        );
        tallier.ingest(&records);
    }

    let total_logs = tallier.total();
    let (tally, unknown_topics) = tallier.finalize();
    let missing_required = tally::missing_required(&params.required_events, &tally);

    Ok(AuditResult {
        chain_id,
        address: params.address,
        block_range: range,
        total_logs,
        tally,
        unknown_topics,
        required_events: params.required_events.clone(),
        missing_required,
    })
}
