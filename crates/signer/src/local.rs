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

use std::fmt::{self, Debug};

use alloy_consensus::TxEnvelope;
use alloy_network::{Ethereum, EthereumWallet, NetworkWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};
use wrapline_provider::TransactionRequest;

use crate::{Error, Result};

/// An account backed by a private key held in process memory
pub struct LocalAccount {
    address: Address,
    wallet: EthereumWallet,
}

impl Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalAccount {{ address: {} }}", self.address)
    }
}

impl LocalAccount {
    /// Derive an account from a hex encoded private key
    pub fn from_private_key(private_key: &SecretString) -> Result<Self> {
        let signer = private_key.expose_secret().parse::<PrivateKeySigner>()?;
        Ok(Self {
            address: signer.address(),
            wallet: EthereumWallet::from(signer),
        })
    }

    /// Get the address of the account
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a transaction
    ///
    /// The request must either leave `from` unset or set it to this account.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<TxEnvelope> {
        if tx.from.is_some_and(|from| from != self.address) {
            return Err(Error::InvalidTransaction(format!(
                "sender is not {}",
                self.address
            )));
        }
        let tx = tx.with_from(self.address);
        let unsigned = TransactionBuilder::<Ethereum>::build_unsigned(tx)?;
        let signed =
            NetworkWallet::<Ethereum>::sign_transaction_from(&self.wallet, self.address, unsigned)
                .await?;
        Ok(signed)
    }
}
