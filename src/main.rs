use std::{path::PathBuf, process::ExitCode, time::Duration};

use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::ProviderBuilder;
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use clap::Parser;
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use event_soundness::abi;
use event_soundness::audit::{self, AuditParams, topics::TopicMap};
use event_soundness::models::errors::{AuditError, ConfigError};
use event_soundness::report::{EXIT_OPERATIONAL, OutputFormat, Report, exit_code};

/// Audit a contract's emitted event topics against its declared ABI
/// over a block range.
#[derive(Parser)]
#[command(name = "event-soundness", version)]
struct Cli {
    /// EVM JSON-RPC endpoint
    #[arg(long, env = "RPC_URL")]
    rpc: String,

    /// Contract address to audit
    #[arg(short, long)]
    address: String,

    /// Path to the ABI JSON file containing event definitions
    #[arg(long)]
    abi: PathBuf,

    /// Start block, inclusive (default: ~5000 blocks behind the head)
    #[arg(long)]
    from_block: Option<u64>,

    /// End block, inclusive (default: chain head)
    #[arg(long)]
    to_block: Option<u64>,

    /// Block chunk size for log queries
    #[arg(long, default_value_t = 2_000, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,

    /// Path to a JSON array of required event names
    #[arg(long)]
    required_events: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// RPC request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so JSON output on stdout stays parsable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

async fn run(cli: Cli) -> Result<u8, AuditError> {
    let started = Instant::now();

    let address: Address = cli
        .address
        .parse()
        .map_err(|_| ConfigError::InvalidAddress {
            input: cli.address.clone(),
        })?;
    let rpc_url: Url = cli.rpc.parse().map_err(|source| ConfigError::InvalidRpcUrl {
        input: cli.rpc.clone(),
        source,
    })?;

    let events = abi::load_event_signatures(&cli.abi)?;
    if events.is_empty() {
        warn!("No events found in ABI; nothing to verify against");
    }
    let topics = TopicMap::build(&events)?;
    info!("Expecting {} event topic(s) from ABI", topics.len());

    let required_events = abi::load_required_events(cli.required_events.as_deref())?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .map_err(ConfigError::HttpClient)?;
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .on_client(RpcClient::new(Http::with_client(http_client, rpc_url), false));

    let params = AuditParams {
        address,
        from_block: cli.from_block,
        to_block: cli.to_block,
        step: cli.step,
        required_events,
    };

    let result = audit::run(&provider, &params, &topics).await?;

    let report = Report {
        rpc: &cli.rpc,
        step: cli.step,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        result: &result,
    };
    println!("{}", report.render(cli.format));

    Ok(exit_code(&result))
}
