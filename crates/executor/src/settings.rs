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

use alloy_primitives::{Address, U256};

/// Gas limit of an approval transaction
pub const DEFAULT_APPROVE_GAS_LIMIT: u64 = 100_000;
/// Gas limit of a wrap transaction
pub const DEFAULT_WRAP_GAS_LIMIT: u64 = 2_000_000;
/// Gas units reserved at the current gas price before a wrap is attempted
pub const DEFAULT_RESERVE_GAS: u64 = 2_000_000;
/// Delay between receipt polls
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Receipt polls before a transaction is considered lost
pub const DEFAULT_RECEIPT_POLL_MAX_RETRIES: u64 = 90;

/// Settings shared by every account of a run
#[derive(Debug, Clone)]
pub struct WrapSettings {
    /// Token contract that is approved and wrapped
    pub token: Address,
    /// Address granted the allowance
    pub spender: Address,
    /// Amount wrapped per transaction, in the token's smallest unit
    pub amount: U256,
    /// Chain id used for signing, queried from the node when unset
    pub chain_id: Option<u64>,
    /// Gas limit of the approval transaction
    pub approve_gas_limit: u64,
    /// Gas limit of each wrap transaction
    pub wrap_gas_limit: u64,
    /// Gas units the balance guard reserves on top of the amount
    pub reserve_gas: u64,
    /// Delay between receipt polls
    pub receipt_poll_interval: Duration,
    /// Receipt polls before giving up on a transaction
    pub receipt_poll_max_retries: u64,
}

impl WrapSettings {
    /// Settings with the default gas and polling parameters
    pub fn new(token: Address, spender: Address, amount: U256) -> Self {
        Self {
            token,
            spender,
            amount,
            chain_id: None,
            approve_gas_limit: DEFAULT_APPROVE_GAS_LIMIT,
            wrap_gas_limit: DEFAULT_WRAP_GAS_LIMIT,
            reserve_gas: DEFAULT_RESERVE_GAS,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            receipt_poll_max_retries: DEFAULT_RECEIPT_POLL_MAX_RETRIES,
        }
    }
}
