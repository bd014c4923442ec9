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

use alloy_primitives::{Address, U256};
use anyhow::Context;
use wrapline_provider::EvmProvider;
use wrapline_utils::log::OkOrLog;

use crate::WrapSettings;

/// Whether `balance` covers `amount` plus `reserve_gas` units at `gas_price`.
///
/// An overflowing requirement can never be covered.
pub fn is_balance_sufficient(
    balance: U256,
    amount: U256,
    gas_price: u128,
    reserve_gas: u64,
) -> bool {
    U256::from(gas_price)
        .checked_mul(U256::from(reserve_gas))
        .and_then(|reserve| reserve.checked_add(amount))
        .is_some_and(|required| balance >= required)
}

/// Check the native balance of `address` against the configured amount and
/// gas reserve. Any RPC failure counts as insufficient.
pub async fn has_sufficient_balance<P: EvmProvider>(
    provider: &P,
    settings: &WrapSettings,
    address: Address,
    wallet_number: usize,
) -> bool {
    let Some((balance, gas_price)) = fetch_balance_and_gas_price(provider, address)
        .await
        .ok_or_log(&format!("[{wallet_number}] Error checking balance"))
    else {
        return false;
    };

    let sufficient =
        is_balance_sufficient(balance, settings.amount, gas_price, settings.reserve_gas);
    if !sufficient {
        tracing::warn!("[{wallet_number}] Insufficient balance for gas.");
    }
    sufficient
}

async fn fetch_balance_and_gas_price<P: EvmProvider>(
    provider: &P,
    address: Address,
) -> anyhow::Result<(U256, u128)> {
    let balance = provider
        .get_balance(address)
        .await
        .context("failed to get balance")?;
    let gas_price = provider
        .get_gas_price()
        .await
        .context("failed to get gas price")?;
    Ok((balance, gas_price))
}
