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

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Approve-then-wrap automation for a list of wallets.
//!
//! For every private key the executor makes sure the configured spender holds a
//! sufficient allowance on the token, then submits `repeat` wrap transactions,
//! checking the native balance before each one.

mod allowance;
pub use allowance::{ensure_approval, get_allowance, ApprovalOutcome};

mod balance;
pub use balance::{has_sufficient_balance, is_balance_sufficient};

mod driver;
pub use driver::{process_accounts, run, AccountReport, RunSummary};

mod executor;
pub use executor::{wrap_tokens, WrapReport};

pub mod keys;

mod sender;

mod settings;
pub use settings::{
    WrapSettings, DEFAULT_APPROVE_GAS_LIMIT, DEFAULT_RECEIPT_POLL_INTERVAL,
    DEFAULT_RECEIPT_POLL_MAX_RETRIES, DEFAULT_RESERVE_GAS, DEFAULT_WRAP_GAS_LIMIT,
};
