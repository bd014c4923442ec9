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

use std::path::Path;

use alloy_primitives::Address;
use anyhow::bail;
use secrecy::SecretString;
use wrapline_provider::EvmProvider;
use wrapline_signer::LocalAccount;
use wrapline_utils::log::OkOrLog;

use crate::{keys, wrap_tokens, WrapReport, WrapSettings};

/// Outcome of one processed account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    /// One-based position of the key among the retained keys
    pub wallet_number: usize,
    /// Address derived from the key
    pub address: Address,
    /// What the executor did for this account
    pub report: WrapReport,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Accounts processed, in key file order
    pub accounts: Vec<AccountReport>,
    /// Keys that passed the length filter but did not yield an account
    pub invalid_keys: usize,
}

impl RunSummary {
    /// Total number of mined wrap transactions
    pub fn wraps_sent(&self) -> usize {
        self.accounts.iter().map(|a| a.report.wrapped.len()).sum()
    }
}

/// Read the key file at `keys_path` and process every key in it.
///
/// Fails without touching the network when the file cannot be read or holds
/// no valid keys.
pub async fn run<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    keys_path: &Path,
    repeat: u64,
) -> anyhow::Result<RunSummary> {
    let keys = keys::read_private_keys(keys_path)?;
    if keys.is_empty() {
        bail!("No valid private keys found in {}", keys_path.display());
    }
    tracing::info!("Loaded {} private keys", keys.len());

    let summary = process_accounts(provider, settings, &keys, repeat).await;
    tracing::info!(
        "Processed {} accounts, {} wraps sent, {} invalid keys",
        summary.accounts.len(),
        summary.wraps_sent(),
        summary.invalid_keys
    );
    Ok(summary)
}

/// Process accounts one at a time in the given order
pub async fn process_accounts<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    keys: &[SecretString],
    repeat: u64,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (idx, key) in keys.iter().enumerate() {
        let wallet_number = idx + 1;
        let Some(account) = LocalAccount::from_private_key(key)
            .ok_or_log(format!("[{wallet_number}] Skipping invalid private key"))
        else {
            summary.invalid_keys += 1;
            continue;
        };

        tracing::info!(
            "[{wallet_number}] Processing account: {}",
            account.address()
        );
        let report = wrap_tokens(provider, settings, &account, wallet_number, repeat).await;
        summary.accounts.push(AccountReport {
            wallet_number,
            address: account.address(),
            report,
        });
    }

    summary
}
