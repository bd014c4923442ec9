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

use std::time::Duration;

use alloy_provider::RootProvider;
use alloy_rpc_client::ClientBuilder;
use alloy_transport::layers::RetryBackoffLayer;
use alloy_transport_http::Http;
use anyhow::Context;
use evm::AlloyEvmProvider;
use url::Url;

use crate::EvmProvider;

pub(crate) mod evm;

const INITIAL_BACKOFF_MILLIS: u64 = 500;
// large enough that the retry layer never throttles on its own
const COMPUTE_UNITS_PER_SECOND: u64 = 1_000_000;

/// Create a new alloy evm provider from a given RPC URL
pub fn new_alloy_evm_provider(
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
    max_rate_limit_retries: u32,
) -> anyhow::Result<impl EvmProvider + Clone> {
    let provider = new_alloy_provider(
        rpc_url,
        provider_client_timeout_seconds,
        max_rate_limit_retries,
    )?;
    Ok(AlloyEvmProvider::new(provider))
}

/// Create a new alloy provider from a given RPC URL
///
/// Every HTTP request is bounded by `provider_client_timeout_seconds`. Requests
/// that fail with a retryable error (HTTP 429 or 503, or a rate limiting
/// JSON-RPC error) are retried up to `max_rate_limit_retries` times.
pub fn new_alloy_provider(
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
    max_rate_limit_retries: u32,
) -> anyhow::Result<RootProvider> {
    let url = Url::parse(rpc_url).context("invalid rpc url")?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(provider_client_timeout_seconds))
        .build()
        .context("failed to build reqwest client")?;
    let retry_layer = RetryBackoffLayer::new(
        max_rate_limit_retries,
        INITIAL_BACKOFF_MILLIS,
        COMPUTE_UNITS_PER_SECOND,
    );
    let client = ClientBuilder::default()
        .layer(retry_layer)
        .transport(Http::with_client(http_client, url), false);
    Ok(RootProvider::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rpc_url() {
        let Err(err) = new_alloy_provider("not a url", 10, 0) else {
            panic!("expected an invalid url error");
        };
        assert!(err.to_string().contains("invalid rpc url"));
    }

    #[test]
    fn test_valid_rpc_url() {
        assert!(new_alloy_evm_provider("https://rpc-polygon.harpie.io", 10, 0).is_ok());
    }
}
