//! The engine's view of the external asset it holds in custody.

use staking_token::{Asset, TokenError};
use staking_types::Address;

/// What the engine needs from the staking/reward token.
///
/// Pulls go through the owner's allowance with the engine as spender; pushes
/// are direct transfers out of the engine's own account. Both must be atomic:
/// on error nothing moved.
pub trait Custody {
    fn balance_of(&self, holder: &Address) -> u128;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    /// Pull `amount` from `owner` into `spender`'s account.
    fn pull(&mut self, spender: &Address, owner: &Address, amount: u128) -> Result<(), TokenError>;

    /// Push `amount` from `from` to `to`.
    fn push(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError>;
}

impl Custody for Asset {
    fn balance_of(&self, holder: &Address) -> u128 {
        Asset::balance_of(self, holder)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        Asset::allowance(self, owner, spender)
    }

    fn pull(&mut self, spender: &Address, owner: &Address, amount: u128) -> Result<(), TokenError> {
        self.transfer_from(spender, owner, spender, amount).map(|_| ())
    }

    fn push(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        self.transfer(from, to, amount).map(|_| ())
    }
}
