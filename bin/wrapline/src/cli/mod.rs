// This file is part of Wrapline.
//
// Wrapline is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Wrapline is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Wrapline.
// If not, see https://www.gnu.org/licenses/.

use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use alloy_primitives::{
    utils::{ParseUnits, Unit},
    Address, U256,
};
use anyhow::{bail, Context};
use clap::{Args, Parser};
use serde::Deserialize;
use wrapline_executor::{
    WrapSettings, DEFAULT_APPROVE_GAS_LIMIT, DEFAULT_RECEIPT_POLL_MAX_RETRIES,
    DEFAULT_RESERVE_GAS, DEFAULT_WRAP_GAS_LIMIT,
};

mod json;
mod metrics;
mod tracing;

use json::get_json_config;

/// Main entry point for the CLI
///
/// Parses the CLI arguments, resolves the wrap configuration and processes
/// every key in the key file.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;
    tracing::info!("Parsed CLI options: {:#?}", opt);

    if let Some(port) = opt.metrics.port {
        let metrics_addr = SocketAddr::new(opt.metrics.host, port);
        metrics::initialize(metrics_addr).context("metrics server should start")?;
    }

    let (amount, repeat) = resolve_wrap_config(&opt.wrap)?;
    let settings = opt.wrap.settings(amount);
    tracing::info!("Wrap settings: {:#?}, repeat: {repeat}", settings);

    let provider = wrapline_provider::new_alloy_evm_provider(
        &opt.provider.node_http,
        opt.provider.timeout_seconds,
        opt.provider.max_rate_limit_retries,
    )?;

    wrapline_executor::run(&provider, &settings, &opt.wrap.keys, repeat).await?;
    Ok(())
}

/// Options for the accounts and transactions of a run
#[derive(Args, Debug)]
#[command(next_help_heading = "WRAP")]
pub struct WrapArgs {
    /// File holding one hex private key per line
    #[arg(long = "keys", name = "keys", env = "KEYS_FILE", default_value = "priv.txt")]
    keys: PathBuf,

    /// JSON file providing `amountToWrap` and `repeat`
    ///
    /// Values given on the command line take precedence.
    #[arg(long = "config", name = "config", env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Amount to wrap per transaction, in ether units
    ///
    /// Must not be negative
    #[arg(
        long = "amount",
        name = "amount",
        env = "AMOUNT_TO_WRAP",
        value_parser = parse_amount
    )]
    amount: Option<U256>,

    /// Number of wrap transactions per account
    #[arg(long = "repeat", name = "repeat", env = "REPEAT")]
    repeat: Option<u64>,

    /// Token contract to approve and wrap
    #[arg(
        long = "contract",
        name = "contract",
        env = "CONTRACT_ADDRESS",
        default_value = "0x1Cd0cd01c8C902AdAb3430ae04b9ea32CB309CF1"
    )]
    contract: Address,

    /// Address granted the allowance
    #[arg(
        long = "spender",
        name = "spender",
        env = "SPENDER_ADDRESS",
        default_value = "0x000000000022D473030F116dDEE9F6B43aC78BA3"
    )]
    spender: Address,

    /// Chain id used for signing
    ///
    /// If not provided, the node is queried for every transaction
    #[arg(long = "chain_id", name = "chain_id", env = "CHAIN_ID")]
    chain_id: Option<u64>,

    #[arg(
        long = "approve_gas_limit",
        name = "approve_gas_limit",
        env = "APPROVE_GAS_LIMIT",
        default_value_t = DEFAULT_APPROVE_GAS_LIMIT
    )]
    approve_gas_limit: u64,

    #[arg(
        long = "wrap_gas_limit",
        name = "wrap_gas_limit",
        env = "WRAP_GAS_LIMIT",
        default_value_t = DEFAULT_WRAP_GAS_LIMIT
    )]
    wrap_gas_limit: u64,

    /// Gas units priced at the current gas price that must remain on top of
    /// the wrap amount before a wrap is sent
    #[arg(
        long = "reserve_gas",
        name = "reserve_gas",
        env = "RESERVE_GAS",
        default_value_t = DEFAULT_RESERVE_GAS
    )]
    reserve_gas: u64,

    #[arg(
        long = "receipt_poll_interval_millis",
        name = "receipt_poll_interval_millis",
        env = "RECEIPT_POLL_INTERVAL_MILLIS",
        default_value = "2000"
    )]
    receipt_poll_interval_millis: u64,

    #[arg(
        long = "receipt_poll_max_retries",
        name = "receipt_poll_max_retries",
        env = "RECEIPT_POLL_MAX_RETRIES",
        default_value_t = DEFAULT_RECEIPT_POLL_MAX_RETRIES
    )]
    receipt_poll_max_retries: u64,
}

impl WrapArgs {
    fn settings(&self, amount: U256) -> WrapSettings {
        WrapSettings {
            chain_id: self.chain_id,
            approve_gas_limit: self.approve_gas_limit,
            wrap_gas_limit: self.wrap_gas_limit,
            reserve_gas: self.reserve_gas,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_millis),
            receipt_poll_max_retries: self.receipt_poll_max_retries,
            ..WrapSettings::new(self.contract, self.spender, amount)
        }
    }
}

/// Connection options for the node
#[derive(Args, Debug)]
#[command(next_help_heading = "PROVIDER")]
pub struct ProviderArgs {
    /// ETH Node HTTP URL to connect to
    #[arg(
        long = "node_http",
        name = "node_http",
        env = "NODE_HTTP",
        default_value = "https://rpc-polygon.harpie.io"
    )]
    node_http: String,

    /// Timeout of every HTTP request to the node
    #[arg(
        long = "provider.timeout_seconds",
        name = "provider.timeout_seconds",
        env = "PROVIDER_TIMEOUT_SECONDS",
        default_value = "60"
    )]
    timeout_seconds: u64,

    /// Retries for rate limited or temporarily unavailable node requests
    ///
    /// Covers HTTP 429 and 503 responses and retryable JSON-RPC errors
    #[arg(
        long = "provider.max_rate_limit_retries",
        name = "provider.max_rate_limit_retries",
        env = "PROVIDER_MAX_RATE_LIMIT_RETRIES",
        default_value = "0"
    )]
    max_rate_limit_retries: u32,
}

/// CLI options for the metrics server
#[derive(Args, Debug)]
#[command(next_help_heading = "METRICS")]
pub struct MetricsArgs {
    /// Port to listen on for metrics requests
    ///
    /// If not provided, metrics are not exported
    #[arg(long = "metrics.port", name = "metrics.port", env = "METRICS_PORT")]
    port: Option<u16>,

    /// Host to listen on for metrics requests
    #[arg(
        long = "metrics.host",
        name = "metrics.host",
        env = "METRICS_HOST",
        default_value = "0.0.0.0"
    )]
    host: IpAddr,
}

/// CLI options for logging
#[derive(Args, Debug)]
#[command(next_help_heading = "LOGS")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stdout
    #[arg(long = "log.file", name = "log.file", env = "LOG_FILE", default_value = None)]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0
    )]
    json: bool,
}

/// CLI options
#[derive(Debug, Parser)]
#[command(name = "wrapline", version, about)]
pub struct Cli {
    #[clap(flatten)]
    wrap: WrapArgs,

    #[clap(flatten)]
    provider: ProviderArgs,

    #[clap(flatten)]
    metrics: MetricsArgs,

    #[clap(flatten)]
    logs: LogsArgs,
}

/// Contents of the JSON config file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WrapConfigFile {
    amount_to_wrap: Option<ConfigAmount>,
    repeat: Option<u64>,
}

/// `amountToWrap` may be written as a string or a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigAmount {
    Text(String),
    Number(serde_json::Number),
}

impl ConfigAmount {
    fn parse(&self) -> anyhow::Result<U256> {
        match self {
            Self::Text(text) => parse_amount(text),
            Self::Number(number) => parse_amount(&number.to_string()),
        }
    }
}

/// Parse a decimal amount in ether units into wei
fn parse_amount(amount: &str) -> anyhow::Result<U256> {
    let parsed = ParseUnits::parse_units(amount.trim(), Unit::ETHER)
        .with_context(|| format!("invalid amountToWrap {amount:?}"))?;
    if parsed.is_negative() {
        bail!("amountToWrap must be non-negative, got {amount:?}");
    }
    Ok(parsed.into())
}

fn load_config_file(path: Option<&Path>) -> anyhow::Result<WrapConfigFile> {
    match path {
        Some(path) => get_json_config(path),
        None => Ok(WrapConfigFile::default()),
    }
}

/// Merge command line values over the config file
fn resolve_wrap_config(args: &WrapArgs) -> anyhow::Result<(U256, u64)> {
    let file = load_config_file(args.config.as_deref())?;

    let amount = match (args.amount, &file.amount_to_wrap) {
        (Some(amount), _) => amount,
        (None, Some(amount)) => amount.parse()?,
        (None, None) => bail!("amountToWrap must be set with --amount or in the config file"),
    };
    let Some(repeat) = args.repeat.or(file.repeat) else {
        bail!("repeat must be set with --repeat or in the config file");
    };

    Ok((amount, repeat))
}
