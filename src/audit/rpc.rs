use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_transport::TransportError;
use tracing::debug;

use crate::models::common::LogRecord;
use crate::models::errors::FetchError;
use crate::utils::retry::{RetryConfig, retry};

/// Transient failures worth another attempt: transport-level errors the
/// stack already classifies as retryable (timeouts, dropped connections,
/// 429s) and provider rate-limit responses. Everything else is fatal
/// for the request.
pub fn is_retryable(error: &TransportError) -> bool {
    match error {
        TransportError::Transport(kind) => kind.is_retry_err(),
        TransportError::ErrorResp(payload) => {
            let message = payload.message.to_ascii_lowercase();
            // -32005 is the conventional "limit exceeded" code (Infura et al.)
            payload.code == -32005
                || message.contains("rate limit")
                || message.contains("too many requests")
        }
        _ => false,
    }
}

pub async fn get_chain_id<P>(provider: &P, config: &RetryConfig) -> Result<u64, FetchError>
where
    P: Provider<AnyNetwork>,
{
    retry(
        || async { provider.get_chain_id().await },
        config,
        "get_chain_id",
        is_retryable,
    )
    .await
    .map_err(|source| FetchError::ChainMetadata {
        what: "chain id",
        source,
    })
}

pub async fn get_latest_block_number<P>(
    provider: &P,
    config: &RetryConfig,
) -> Result<u64, FetchError>
where
    P: Provider<AnyNetwork>,
{
    retry(
        || async { provider.get_block_number().await },
        config,
        "get_latest_block_number",
        is_retryable,
    )
    .await
    .map_err(|source| FetchError::ChainMetadata {
        what: "latest block number",
        source,
    })
}

/// Fetch every log the address emitted in blocks [from, to] (all topics,
/// no filter beyond the address) and reduce them to audit records.
pub async fn get_logs_chunk<P>(
    provider: &P,
    address: Address,
    from: u64,
    to: u64,
    config: &RetryConfig,
) -> Result<Vec<LogRecord>, FetchError>
where
    P: Provider<AnyNetwork>,
{
    let filter = Filter::new().address(address).from_block(from).to_block(to);
    let context = format!("get_logs [{from}, {to}]");

    let logs = retry(
        || async { provider.get_logs(&filter).await },
        config,
        &context,
        is_retryable,
    )
    .await
    .map_err(|source| {
        if is_retryable(&source) {
            FetchError::ChunkExhausted {
                from,
                to,
                attempts: config.max_attempts,
                source,
            }
        } else {
            FetchError::Chunk { from, to, source }
        }
    })?;

    Ok(logs.iter().filter_map(to_record).collect())
}

fn to_record(log: &Log) -> Option<LogRecord> {
    let Some(topic) = log.inner.data.topics().first().copied() else {
        debug!(
            "Skipping log without topic0 at block {:?} from {}",
            log.block_number, log.inner.address
        );
        return None;
    };
    Some(LogRecord {
        topic,
        block_number: log.block_number.unwrap_or_default(),
        address: log.inner.address,
        data: log.inner.data.data.clone(),
    })
}
