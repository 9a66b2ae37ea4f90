//! mailserver-ping: probe mailserver reachability from the command line
//!
//! Prints one line per input address (or a JSON array with `--json`).
//! Logs go to stderr; stdout only carries results.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailserver_ping::{
    CancellationToken, HickoryNameResolver, PingApi, PingConfig, PingQuery, PingResult,
    PingService, Scheme, TcpRttProbe, TomlConfigLoader,
};

/// Log filter consulted when `RUST_LOG` is unset.
const LOG_ENV: &str = "MAILSERVER_PING_LOG";

/// Probe mailservers for round-trip latency
#[derive(Parser, Debug)]
#[command(name = "mailserver-ping")]
#[command(about = "Concurrently probe enode or multiaddr mailservers for round-trip latency")]
struct Args {
    /// Addresses are multiaddrs instead of enode URLs
    #[arg(long, conflicts_with = "mailserver_version")]
    multiaddr: bool,

    /// Pick the address scheme from a mailserver record version (2 = multiaddr)
    #[arg(long, value_name = "N")]
    mailserver_version: Option<u32>,

    /// Shared deadline for the whole batch in milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// TOML config file with a [ping] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum probes in flight
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Addresses to probe
    #[arg(required = true, value_name = "ADDRESS")]
    addresses: Vec<String>,
}

impl Args {
    fn scheme(&self) -> Scheme {
        match (self.multiaddr, self.mailserver_version) {
            (true, _) => Scheme::Multiaddr,
            (false, Some(version)) => Scheme::for_mailserver_version(version),
            (false, None) => Scheme::Enode,
        }
    }

    fn load_config(&self) -> anyhow::Result<PingConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfigLoader::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TomlConfigLoader::from_env()?,
        };
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        Ok(config)
    }
}

fn init_logging(json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .or_else(|_| EnvFilter::try_new("warn"))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

fn render_line(result: &PingResult) -> String {
    match (&result.rtt_ms, &result.error) {
        (Some(rtt), _) => format!("{}  {}ms", result.address, rtt),
        (None, Some(error)) => format!("{}  error: {}", result.address, error),
        (None, None) => format!("{}  error: unknown", result.address),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json)?;

    let config = args.load_config()?;
    let probe = TcpRttProbe::new().with_bind_address(config.bind_address);
    let service = PingService::new(
        Arc::new(probe),
        Arc::new(HickoryNameResolver::from_system_conf()),
        config,
    )?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding probes");
            on_signal.cancel();
        }
    });

    let scheme = args.scheme();
    let query = PingQuery {
        addresses: args.addresses,
        timeout_ms: args.timeout_ms,
    };
    let results = service.ping_scheme(query, scheme, cancel).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", render_line(result));
        }
    }

    Ok(())
}
