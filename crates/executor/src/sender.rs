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

use alloy_eips::eip2718::Encodable2718;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Bytes, TxHash};
use anyhow::{bail, Context};
use wrapline_provider::{EvmProvider, TransactionRequest};
use wrapline_signer::LocalAccount;

use crate::WrapSettings;

/// Sign `input` as a call to the token contract, broadcast it and wait for it
/// to be mined successfully.
pub(crate) async fn send_transaction<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    account: &LocalAccount,
    input: Bytes,
    gas_limit: u64,
) -> anyhow::Result<TxHash> {
    let from = account.address();
    let chain_id = match settings.chain_id {
        Some(chain_id) => chain_id,
        None => provider
            .get_chain_id()
            .await
            .context("failed to get chain id")?,
    };
    let nonce = provider
        .get_transaction_count(from)
        .await
        .context("failed to get nonce")?;
    let gas_price = provider
        .get_gas_price()
        .await
        .context("failed to get gas price")?;

    let tx = TransactionRequest::default()
        .with_from(from)
        .with_to(settings.token)
        .with_input(input)
        .with_chain_id(chain_id)
        .with_nonce(nonce)
        .with_gas_price(gas_price)
        .with_gas_limit(gas_limit);
    let signed = account.sign_transaction(tx).await?;

    let tx_hash = provider
        .send_raw_transaction(signed.encoded_2718().into())
        .await
        .context("failed to send transaction")?;
    tracing::debug!("Sent transaction {tx_hash} from {from} with nonce {nonce}");

    wait_for_txn(
        provider,
        tx_hash,
        settings.receipt_poll_max_retries,
        settings.receipt_poll_interval,
    )
    .await?;
    Ok(tx_hash)
}

pub(crate) async fn wait_for_txn<P: EvmProvider>(
    provider: &P,
    tx_hash: TxHash,
    max_retries: u64,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    for _ in 0..max_retries {
        match provider
            .get_transaction_status(tx_hash)
            .await
            .context("failed to get transaction receipt")?
        {
            Some(true) => return Ok(()),
            Some(false) => bail!("transaction {tx_hash} reverted"),
            None => tokio::time::sleep(poll_interval).await,
        }
    }
    bail!("transaction {tx_hash} not mined after {max_retries} receipt polls")
}

#[cfg(test)]
mod tests {
    use alloy_consensus::{Transaction, TxEnvelope};
    use alloy_eips::eip2718::Decodable2718;
    use alloy_primitives::{address, bytes, Address, B256, U256};
    use mockall::Sequence;
    use secrecy::SecretString;
    use wrapline_provider::MockEvmProvider;

    use super::*;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TOKEN: Address = address!("1Cd0cd01c8C902AdAb3430ae04b9ea32CB309CF1");

    fn account() -> LocalAccount {
        LocalAccount::from_private_key(&SecretString::from(KEY.to_string())).unwrap()
    }

    fn settings() -> WrapSettings {
        let mut settings = WrapSettings::new(TOKEN, Address::ZERO, U256::from(1));
        settings.receipt_poll_interval = Duration::ZERO;
        settings.receipt_poll_max_retries = 3;
        settings
    }

    fn check_tx(raw: &Bytes, nonce: u64, chain_id: u64) -> bool {
        let tx = TxEnvelope::decode_2718(&mut &raw[..]).unwrap();
        tx.nonce() == nonce
            && tx.chain_id() == Some(chain_id)
            && tx.gas_price() == Some(5)
            && tx.gas_limit() == 21_000
            && tx.to() == Some(TOKEN)
            && tx.input() == &bytes!("c0ffee")
    }

    #[tokio::test]
    async fn test_send_transaction_queries_chain_id() {
        let mut provider = MockEvmProvider::new();
        provider.expect_get_chain_id().once().returning(|| Ok(137));
        provider.expect_get_transaction_count().returning(|_| Ok(4));
        provider.expect_get_gas_price().returning(|| Ok(5));
        provider
            .expect_send_raw_transaction()
            .once()
            .withf(|raw| check_tx(raw, 4, 137))
            .returning(|_| Ok(B256::repeat_byte(1)));
        provider
            .expect_get_transaction_status()
            .returning(|_| Ok(Some(true)));

        let tx_hash = send_transaction(
            &provider,
            &settings(),
            &account(),
            bytes!("c0ffee"),
            21_000,
        )
        .await
        .unwrap();
        assert_eq!(tx_hash, B256::repeat_byte(1));
    }

    #[tokio::test]
    async fn test_send_transaction_configured_chain_id() {
        let mut provider = MockEvmProvider::new();
        provider.expect_get_chain_id().never();
        provider.expect_get_transaction_count().returning(|_| Ok(0));
        provider.expect_get_gas_price().returning(|| Ok(5));
        provider
            .expect_send_raw_transaction()
            .withf(|raw| check_tx(raw, 0, 80002))
            .returning(|_| Ok(B256::ZERO));
        provider
            .expect_get_transaction_status()
            .returning(|_| Ok(Some(true)));

        let mut settings = settings();
        settings.chain_id = Some(80002);
        send_transaction(&provider, &settings, &account(), bytes!("c0ffee"), 21_000)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_pending_then_mined() {
        let mut provider = MockEvmProvider::new();
        let mut seq = Sequence::new();
        provider
            .expect_get_transaction_status()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        provider
            .expect_get_transaction_status()
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(true)));

        wait_for_txn(&provider, B256::ZERO, 3, Duration::ZERO)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_reverted() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_get_transaction_status()
            .once()
            .returning(|_| Ok(Some(false)));

        let err = wait_for_txn(&provider, B256::ZERO, 3, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reverted"));
    }

    #[tokio::test]
    async fn test_wait_for_gives_up() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_get_transaction_status()
            .times(3)
            .returning(|_| Ok(None));

        let err = wait_for_txn(&provider, B256::ZERO, 3, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not mined"));
    }
}
