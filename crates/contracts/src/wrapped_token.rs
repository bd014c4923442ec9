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

//! ERC-20 token that can wrap itself into a second token.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    interface IWrappedToken {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function wrap(uint256 amount, address to) external;
    }
}

/// Read-only call for the allowance `owner` granted to `spender`
pub fn allowance_call(owner: Address, spender: Address) -> IWrappedToken::allowanceCall {
    IWrappedToken::allowanceCall { owner, spender }
}

/// Approval of the maximum representable amount
pub fn max_approval_call(spender: Address) -> IWrappedToken::approveCall {
    IWrappedToken::approveCall {
        spender,
        amount: U256::MAX,
    }
}

/// Wrap `amount` and credit the wrapped tokens to `to`
pub fn wrap_call(amount: U256, to: Address) -> IWrappedToken::wrapCall {
    IWrappedToken::wrapCall { amount, to }
}

/// Decode the return data of an `allowance` call
pub fn decode_allowance(data: &[u8]) -> Result<U256, alloy_sol_types::Error> {
    IWrappedToken::allowanceCall::abi_decode_returns(data)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use alloy_sol_types::{SolInterface, SolValue};

    use super::*;

    const SPENDER: Address = address!("000000000022D473030F116dDEE9F6B43aC78BA3");

    #[test]
    fn test_max_approval_is_unbounded() {
        let call = max_approval_call(SPENDER);
        let decoded =
            IWrappedToken::IWrappedTokenCalls::abi_decode(&call.abi_encode()).unwrap();
        let IWrappedToken::IWrappedTokenCalls::approve(approve) = decoded else {
            panic!("expected approve call");
        };
        assert_eq!(approve.spender, SPENDER);
        assert_eq!(approve.amount, U256::MAX);
    }

    #[test]
    fn test_wrap_selector() {
        let data = wrap_call(U256::from(1), SPENDER).abi_encode();
        assert_eq!(&data[..4], IWrappedToken::wrapCall::SELECTOR.as_slice());
        // uint256 amount, address to
        assert_eq!(data.len(), 4 + 32 * 2);
    }

    #[test]
    fn test_decode_allowance() {
        let encoded = U256::from(12345).abi_encode();
        assert_eq!(decode_allowance(&encoded).unwrap(), U256::from(12345));
        assert!(decode_allowance(&[0u8; 3]).is_err());
    }
}
