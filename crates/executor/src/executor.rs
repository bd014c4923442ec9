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

use alloy_primitives::{utils::format_ether, TxHash};
use alloy_sol_types::SolCall;
use metrics::Counter;
use metrics_derive::Metrics;
use wrapline_contracts::wrapped_token;
use wrapline_provider::EvmProvider;
use wrapline_signer::LocalAccount;
use wrapline_utils::log::LogOnError;

use crate::{allowance, balance, sender, ApprovalOutcome, WrapSettings};

/// What happened to a single account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapReport {
    /// Result of the allowance step
    pub approval: ApprovalOutcome,
    /// Hashes of the mined wrap transactions, in order
    pub wrapped: Vec<TxHash>,
    /// Iterations skipped by the balance guard
    pub skipped: u64,
    /// True if a wrap failed and the remaining iterations were abandoned
    pub failed: bool,
}

/// Ensure the allowance once, then attempt `repeat` wraps of the configured
/// amount to the account itself.
///
/// An iteration is skipped when the balance guard fails. The first failed wrap
/// ends the loop for this account.
pub async fn wrap_tokens<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    account: &LocalAccount,
    wallet_number: usize,
    repeat: u64,
) -> WrapReport {
    let metrics = WrapMetrics::default();

    let approval = allowance::ensure_approval(provider, settings, account, wallet_number).await;
    match approval {
        ApprovalOutcome::Approved(_) => metrics.approvals_sent.increment(1),
        ApprovalOutcome::Failed => metrics.approval_failures.increment(1),
        ApprovalOutcome::AlreadySufficient => {}
    }

    let mut report = WrapReport {
        approval,
        wrapped: vec![],
        skipped: 0,
        failed: false,
    };

    for _ in 0..repeat {
        if !balance::has_sufficient_balance(provider, settings, account.address(), wallet_number)
            .await
        {
            tracing::warn!("[{wallet_number}] Skipping transaction due to low balance.");
            metrics.wraps_skipped.increment(1);
            report.skipped += 1;
            continue;
        }

        tracing::info!(
            "[{wallet_number}] Wrapping {} tokens...",
            format_ether(settings.amount)
        );
        let call = wrapped_token::wrap_call(settings.amount, account.address());
        match sender::send_transaction(
            provider,
            settings,
            account,
            call.abi_encode().into(),
            settings.wrap_gas_limit,
        )
        .await
        .log_on_error(format!("[{wallet_number}] Wrapping failed"))
        {
            Ok(tx_hash) => {
                tracing::info!("[{wallet_number}] Wrap successful! Tx Hash: {tx_hash}");
                metrics.wraps_sent.increment(1);
                report.wrapped.push(tx_hash);
            }
            Err(_) => {
                metrics.wrap_failures.increment(1);
                report.failed = true;
                break;
            }
        }
    }

    report
}

#[derive(Metrics)]
#[metrics(scope = "wrapline")]
struct WrapMetrics {
    #[metric(describe = "the number of approval transactions mined")]
    approvals_sent: Counter,
    #[metric(describe = "the number of failed allowance checks or approvals")]
    approval_failures: Counter,
    #[metric(describe = "the number of wrap transactions mined")]
    wraps_sent: Counter,
    #[metric(describe = "the number of wraps skipped for low balance")]
    wraps_skipped: Counter,
    #[metric(describe = "the number of failed wrap transactions")]
    wrap_failures: Counter,
}
