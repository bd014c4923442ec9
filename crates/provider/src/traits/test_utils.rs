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

//! In-memory chain used for deterministic tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use alloy_consensus::TxEnvelope;
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::{SolCall, SolValue};
use anyhow::{anyhow, Context};
use parking_lot::Mutex;
use wrapline_contracts::wrapped_token::IWrappedToken;

use crate::{EvmProvider, ProviderResult};

/// A single request observed by [`InMemoryEvmProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    /// `eth_chainId`
    ChainId,
    /// `eth_getBalance`
    Balance(Address),
    /// `eth_gasPrice`
    GasPrice,
    /// `eth_getTransactionCount`
    TransactionCount(Address),
    /// `eth_call` of `allowance(owner, spender)`
    Allowance {
        /// Token owner
        owner: Address,
        /// Approved spender
        spender: Address,
    },
    /// `eth_sendRawTransaction`
    SendRawTransaction(TxHash),
    /// `eth_getTransactionReceipt`
    TransactionStatus(TxHash),
}

#[derive(Debug, Default)]
struct ChainState {
    chain_id: u64,
    gas_price: u128,
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, U256>,
    fail_balance_reads: bool,
    fail_allowance_reads: bool,
    revert_from_send: Option<usize>,
    reverted: HashSet<TxHash>,
    sent: Vec<TxEnvelope>,
    requests: Vec<RecordedRequest>,
}

/// Deterministic [`EvmProvider`] backed by process memory
///
/// Balances and allowances are fixed per address. Every request is recorded so
/// tests can assert on the exact order of chain interactions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvmProvider {
    state: Arc<Mutex<ChainState>>,
}

impl InMemoryEvmProvider {
    /// Create a new in-memory chain with the given chain id and gas price
    pub fn new(chain_id: u64, gas_price: u128) -> Self {
        let state = ChainState {
            chain_id,
            gas_price,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Set the native balance of an address
    pub fn set_balance(&self, address: Address, balance: U256) {
        self.state.lock().balances.insert(address, balance);
    }

    /// Set the allowance an owner has granted to any spender
    pub fn set_allowance(&self, owner: Address, allowance: U256) {
        self.state.lock().allowances.insert(owner, allowance);
    }

    /// Make every balance read fail
    pub fn fail_balance_reads(&self) {
        self.state.lock().fail_balance_reads = true;
    }

    /// Make every allowance read fail
    pub fn fail_allowance_reads(&self) {
        self.state.lock().fail_allowance_reads = true;
    }

    /// Revert every transaction sent after the first `count`
    pub fn revert_after_sends(&self, count: usize) {
        self.state.lock().revert_from_send = Some(count);
    }

    /// Transactions broadcast so far, in order
    pub fn sent_transactions(&self) -> Vec<TxEnvelope> {
        self.state.lock().sent.clone()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of requests matching `pred`
    pub fn count_requests(&self, pred: impl Fn(&RecordedRequest) -> bool) -> usize {
        self.state.lock().requests.iter().filter(|r| pred(r)).count()
    }
}

#[async_trait::async_trait]
impl EvmProvider for InMemoryEvmProvider {
    async fn get_chain_id(&self) -> ProviderResult<u64> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::ChainId);
        Ok(state.chain_id)
    }

    async fn get_balance(&self, address: Address) -> ProviderResult<U256> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Balance(address));
        if state.fail_balance_reads {
            return Err(anyhow!("balance unavailable").into());
        }
        Ok(state.balances.get(&address).copied().unwrap_or_default())
    }

    async fn get_gas_price(&self) -> ProviderResult<u128> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::GasPrice);
        Ok(state.gas_price)
    }

    async fn get_transaction_count(&self, address: Address) -> ProviderResult<u64> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::TransactionCount(address));
        Ok(state.sent.len() as u64)
    }

    async fn call(&self, tx: &TransactionRequest) -> ProviderResult<Bytes> {
        let input = tx.input.input().cloned().unwrap_or_default();
        let call = IWrappedToken::allowanceCall::abi_decode(&input)
            .context("only allowance calls are supported")?;

        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Allowance {
            owner: call.owner,
            spender: call.spender,
        });
        if state.fail_allowance_reads {
            return Err(anyhow!("allowance unavailable").into());
        }
        let allowance = state.allowances.get(&call.owner).copied().unwrap_or_default();
        Ok(allowance.abi_encode().into())
    }

    async fn send_raw_transaction(&self, tx: Bytes) -> ProviderResult<TxHash> {
        let envelope = TxEnvelope::decode_2718(&mut &tx[..])
            .context("invalid raw transaction")?;
        let tx_hash = keccak256(&tx);

        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::SendRawTransaction(tx_hash));
        if state
            .revert_from_send
            .is_some_and(|count| state.sent.len() >= count)
        {
            state.reverted.insert(tx_hash);
        }
        state.sent.push(envelope);
        Ok(tx_hash)
    }

    async fn get_transaction_status(&self, tx_hash: TxHash) -> ProviderResult<Option<bool>> {
        let mut state = self.state.lock();
        state
            .requests
            .push(RecordedRequest::TransactionStatus(tx_hash));
        Ok(Some(!state.reverted.contains(&tx_hash)))
    }
}
