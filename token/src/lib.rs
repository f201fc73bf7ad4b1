//! Fungible balance ledgers.
//!
//! Two ledgers live here:
//! - [`FungibleLedger`]: plain transferable balances with mint and burn. The
//!   staking engine uses one as its receipt token.
//! - [`Asset`]: an external fungible asset (the staking/reward token) with an
//!   allowance table, so a spender can pull funds an owner authorized.
//!
//! Both keep `total_supply == Σ balances` after every successful call, and a
//! failed call leaves every balance and allowance untouched.

pub mod asset;
pub mod error;
pub mod ledger;

pub use asset::Asset;
pub use error::TokenError;
pub use ledger::{FungibleLedger, TransferRecord};
