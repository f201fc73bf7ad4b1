//! Transferable-balance ledger with conserved supply.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use staking_types::Address;

use crate::error::TokenError;

/// One balance movement. Mints have no `from`, burns have no `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub amount: u128,
}

/// Per-holder balances plus the running total supply.
///
/// Holders with a zero balance are dropped from the map, so `holders()` only
/// yields accounts that own something.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FungibleLedger {
    balances: HashMap<Address, u128>,
    total_supply: u128,
}

impl FungibleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Accounts with a non-zero balance, in no particular order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    /// Check that `holder` can be debited `amount` without mutating anything.
    pub fn ensure_balance(&self, holder: &Address, amount: u128) -> Result<(), TokenError> {
        let available = self.balance_of(holder);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to`. A self-transfer is a no-op that
    /// still requires the balance to cover it.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferRecord, TokenError> {
        self.ensure_balance(from, amount)?;
        if from != to {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            let debited = self.balance_of(from) - amount;
            self.set_balance(from, debited);
            self.set_balance(to, credited);
        }
        tracing::trace!(%from, %to, amount, "ledger transfer");
        Ok(TransferRecord {
            from: Some(from.clone()),
            to: Some(to.clone()),
            amount,
        })
    }

    /// Create `amount` new units owned by `to`.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<TransferRecord, TokenError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(to, credited);
        tracing::trace!(%to, amount, "ledger mint");
        Ok(TransferRecord {
            from: None,
            to: Some(to.clone()),
            amount,
        })
    }

    /// Destroy `amount` units owned by `from`.
    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<TransferRecord, TokenError> {
        self.ensure_balance(from, amount)?;
        let debited = self.balance_of(from) - amount;
        self.set_balance(from, debited);
        // Supply is the sum of balances, so it covers any single balance.
        self.total_supply -= amount;
        tracing::trace!(%from, amount, "ledger burn");
        Ok(TransferRecord {
            from: Some(from.clone()),
            to: None,
            amount,
        })
    }

    fn set_balance(&mut self, holder: &Address, amount: u128) {
        if amount == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(holder.clone(), amount);
        }
    }
}
