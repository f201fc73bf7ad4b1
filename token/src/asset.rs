//! External fungible asset with an allowance model.
//!
//! This is the token people stake and get rewarded in. Owners authorize a
//! spender with [`Asset::approve`]; the spender then pulls with
//! [`Asset::transfer_from`]. Direct pushes use [`Asset::transfer`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use staking_types::Address;

use crate::error::TokenError;
use crate::ledger::{FungibleLedger, TransferRecord};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset {
    name: String,
    symbol: String,
    ledger: FungibleLedger,
    /// owner → spender → remaining cap.
    allowances: HashMap<Address, HashMap<Address, u128>>,
}

impl Asset {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            ledger: FungibleLedger::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.ledger.balance_of(holder)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Issue new units to `to`. Used to seed balances in tests and simulations.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<TransferRecord, TokenError> {
        self.ledger.mint(to, amount)
    }

    /// Set (not add to) the amount `spender` may pull from `owner`.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        let caps = self.allowances.entry(owner.clone()).or_default();
        if amount == 0 {
            caps.remove(spender);
        } else {
            caps.insert(spender.clone(), amount);
        }
        tracing::debug!(%owner, %spender, amount, "allowance set");
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|caps| caps.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Push `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferRecord, TokenError> {
        self.ledger.transfer(from, to, amount)
    }

    /// `spender` pulls `amount` from `owner` into `to`, consuming allowance.
    ///
    /// The allowance is checked before the balance. Either both the move and
    /// the allowance decrement happen, or neither does.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferRecord, TokenError> {
        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                available: approved,
            });
        }
        let record = self.ledger.transfer(owner, to, amount)?;
        self.approve(owner, spender, approved - amount);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    fn funded_asset() -> Asset {
        let mut asset = Asset::new("Stake Token", "STK");
        asset.mint(&addr("user"), 1_000).unwrap();
        asset
    }

    #[test]
    fn metadata() {
        let asset = Asset::new("Stake Token", "STK");
        assert_eq!(asset.name(), "Stake Token");
        assert_eq!(asset.symbol(), "STK");
        assert_eq!(asset.total_supply(), 0);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut asset = funded_asset();
        asset.approve(&addr("user"), &addr("pool"), 300);
        asset
            .transfer_from(&addr("pool"), &addr("user"), &addr("pool"), 250)
            .unwrap();
        assert_eq!(asset.balance_of(&addr("user")), 750);
        assert_eq!(asset.balance_of(&addr("pool")), 250);
        assert_eq!(asset.allowance(&addr("user"), &addr("pool")), 50);
    }

    #[test]
    fn transfer_from_without_approval_fails() {
        let mut asset = funded_asset();
        let err = asset
            .transfer_from(&addr("pool"), &addr("user"), &addr("pool"), 100)
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                needed: 100,
                available: 0
            }
        );
        assert_eq!(asset.balance_of(&addr("user")), 1_000);
    }

    #[test]
    fn transfer_from_with_small_approval_fails_and_keeps_allowance() {
        let mut asset = funded_asset();
        asset.approve(&addr("user"), &addr("pool"), 40);
        assert!(matches!(
            asset.transfer_from(&addr("pool"), &addr("user"), &addr("pool"), 100),
            Err(TokenError::InsufficientAllowance { needed: 100, available: 40 })
        ));
        assert_eq!(asset.allowance(&addr("user"), &addr("pool")), 40);
    }

    #[test]
    fn transfer_from_short_balance_keeps_allowance() {
        let mut asset = funded_asset();
        asset.approve(&addr("user"), &addr("pool"), 5_000);
        assert!(matches!(
            asset.transfer_from(&addr("pool"), &addr("user"), &addr("pool"), 2_000),
            Err(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(asset.allowance(&addr("user"), &addr("pool")), 5_000);
        assert_eq!(asset.balance_of(&addr("user")), 1_000);
    }

    #[test]
    fn approve_overwrites_previous_cap() {
        let mut asset = funded_asset();
        asset.approve(&addr("user"), &addr("pool"), 100);
        asset.approve(&addr("user"), &addr("pool"), 10);
        assert_eq!(asset.allowance(&addr("user"), &addr("pool")), 10);
        asset.approve(&addr("user"), &addr("pool"), 0);
        assert_eq!(asset.allowance(&addr("user"), &addr("pool")), 0);
    }

    #[test]
    fn serializes_to_json() {
        let mut asset = funded_asset();
        asset.approve(&addr("user"), &addr("pool"), 7);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["symbol"], "STK");
        assert_eq!(json["allowances"]["user"]["pool"], 7);
    }
}
