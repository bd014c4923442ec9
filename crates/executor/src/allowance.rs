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

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use anyhow::Context;
use wrapline_contracts::wrapped_token;
use wrapline_provider::{EvmProvider, TransactionRequest};
use wrapline_signer::LocalAccount;
use wrapline_utils::log::LogOnError;

use crate::{sender, WrapSettings};

/// Result of [`ensure_approval`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The existing allowance covers the configured amount
    AlreadySufficient,
    /// An unlimited approval was mined in the given transaction
    Approved(TxHash),
    /// Reading the allowance or sending the approval failed
    Failed,
}

/// Read the allowance `owner` has granted `spender` on `token`
pub async fn get_allowance<P: EvmProvider>(
    provider: &P,
    token: Address,
    owner: Address,
    spender: Address,
) -> anyhow::Result<U256> {
    let tx = TransactionRequest::default()
        .with_to(token)
        .with_call(&wrapped_token::allowance_call(owner, spender));
    let data = provider
        .call(&tx)
        .await
        .context("failed to call allowance")?;
    wrapped_token::decode_allowance(&data).context("failed to decode allowance")
}

/// Make sure the spender may move at least the configured amount on behalf of
/// the account, approving `U256::MAX` if it may not.
///
/// The allowance is compared against a single wrap amount. Errors are logged
/// and never returned: the caller continues with the wraps either way.
pub async fn ensure_approval<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    account: &LocalAccount,
    wallet_number: usize,
) -> ApprovalOutcome {
    try_ensure_approval(provider, settings, account, wallet_number)
        .await
        .log_on_error(format!("[{wallet_number}] Approval failed"))
        .unwrap_or(ApprovalOutcome::Failed)
}

async fn try_ensure_approval<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    account: &LocalAccount,
    wallet_number: usize,
) -> anyhow::Result<ApprovalOutcome> {
    let allowance = get_allowance(
        provider,
        settings.token,
        account.address(),
        settings.spender,
    )
    .await?;
    if allowance >= settings.amount {
        tracing::info!("[{wallet_number}] Allowance is already sufficient.");
        return Ok(ApprovalOutcome::AlreadySufficient);
    }

    tracing::info!(
        "[{wallet_number}] Approving {} to spend tokens of {}...",
        settings.spender,
        settings.token
    );
    let call = wrapped_token::max_approval_call(settings.spender);
    let tx_hash = sender::send_transaction(
        provider,
        settings,
        account,
        call.abi_encode().into(),
        settings.approve_gas_limit,
    )
    .await?;
    tracing::info!("[{wallet_number}] Approval successful! Tx Hash: {tx_hash}");

    Ok(ApprovalOutcome::Approved(tx_hash))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy_consensus::{Transaction, TxEnvelope};
    use alloy_eips::eip2718::Decodable2718;
    use alloy_primitives::{address, Bytes, B256};
    use alloy_sol_types::{SolInterface, SolValue};
    use secrecy::SecretString;
    use wrapline_contracts::wrapped_token::IWrappedToken::{self, IWrappedTokenCalls};
    use wrapline_provider::{MockEvmProvider, ProviderError};

    use super::*;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const TOKEN: Address = address!("1Cd0cd01c8C902AdAb3430ae04b9ea32CB309CF1");
    const SPENDER: Address = address!("000000000022D473030F116dDEE9F6B43aC78BA3");

    fn account() -> LocalAccount {
        LocalAccount::from_private_key(&SecretString::from(KEY.to_string())).unwrap()
    }

    fn settings(amount: u64) -> WrapSettings {
        let mut settings = WrapSettings::new(TOKEN, SPENDER, U256::from(amount));
        settings.chain_id = Some(137);
        settings.receipt_poll_interval = Duration::ZERO;
        settings.receipt_poll_max_retries = 1;
        settings
    }

    fn set_allowance(provider: &mut MockEvmProvider, allowance: u64) {
        provider
            .expect_call()
            .once()
            .withf(|tx| {
                let input = tx.input.input().cloned().unwrap_or_default();
                let Ok(call) = IWrappedToken::allowanceCall::abi_decode(&input) else {
                    return false;
                };
                tx.to == Some(TOKEN.into()) && call.owner == KEY_ADDRESS && call.spender == SPENDER
            })
            .returning(move |_| Ok(U256::from(allowance).abi_encode().into()));
    }

    fn is_max_approval(raw: &Bytes) -> bool {
        let tx = TxEnvelope::decode_2718(&mut &raw[..]).unwrap();
        let Ok(IWrappedTokenCalls::approve(call)) = IWrappedTokenCalls::abi_decode(tx.input())
        else {
            return false;
        };
        tx.gas_limit() == 100_000 && call.spender == SPENDER && call.amount == U256::MAX
    }

    #[tokio::test]
    async fn test_allowance_sufficient() {
        let mut provider = MockEvmProvider::new();
        set_allowance(&mut provider, 100);
        provider.expect_send_raw_transaction().never();

        let outcome = ensure_approval(&provider, &settings(100), &account(), 1).await;
        assert_eq!(outcome, ApprovalOutcome::AlreadySufficient);
    }

    #[tokio::test]
    async fn test_allowance_insufficient_approves_max() {
        let mut provider = MockEvmProvider::new();
        set_allowance(&mut provider, 99);
        provider.expect_get_transaction_count().returning(|_| Ok(0));
        provider.expect_get_gas_price().returning(|| Ok(1));
        provider
            .expect_send_raw_transaction()
            .once()
            .withf(is_max_approval)
            .returning(|_| Ok(B256::repeat_byte(0xaa)));
        provider
            .expect_get_transaction_status()
            .returning(|_| Ok(Some(true)));

        let outcome = ensure_approval(&provider, &settings(100), &account(), 1).await;
        assert_eq!(outcome, ApprovalOutcome::Approved(B256::repeat_byte(0xaa)));
    }

    #[tokio::test]
    async fn test_allowance_read_failure_is_swallowed() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_call()
            .returning(|_| Err(ProviderError::Other(anyhow::anyhow!("rpc down"))));
        provider.expect_send_raw_transaction().never();

        let outcome = ensure_approval(&provider, &settings(100), &account(), 3).await;
        assert_eq!(outcome, ApprovalOutcome::Failed);
    }

    #[tokio::test]
    async fn test_reverted_approval_is_swallowed() {
        let mut provider = MockEvmProvider::new();
        set_allowance(&mut provider, 0);
        provider.expect_get_transaction_count().returning(|_| Ok(0));
        provider.expect_get_gas_price().returning(|| Ok(1));
        provider
            .expect_send_raw_transaction()
            .once()
            .returning(|_| Ok(B256::ZERO));
        provider
            .expect_get_transaction_status()
            .returning(|_| Ok(Some(false)));

        let outcome = ensure_approval(&provider, &settings(1), &account(), 2).await;
        assert_eq!(outcome, ApprovalOutcome::Failed);
    }

    #[tokio::test]
    async fn test_get_allowance_bad_return_data() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_call()
            .returning(|_| Ok(Bytes::from_static(&[1, 2, 3])));

        let err = get_allowance(&provider, TOKEN, KEY_ADDRESS, SPENDER)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
