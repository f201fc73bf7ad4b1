//! Reward-engine errors.
//!
//! Every variant is a precondition failure detected before any state is
//! committed. None of them is transient.

use staking_token::TokenError;
use staking_types::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("amount must be > 0")]
    InvalidAmount,

    #[error("insufficient allowance: need {needed}, approved {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("withdraw exceeds stake: requested {requested}, staked {staked}")]
    ExceedsStake { requested: u128, staked: u128 },

    #[error("insufficient reward reserve: need {needed}, have {available}")]
    InsufficientReserve { needed: u128, available: u128 },

    #[error("{caller} is not the pool owner")]
    Unauthorized { caller: Address },

    #[error("{account} is the pool's custody account and cannot deposit into itself")]
    CustodyAccount { account: Address },

    #[error("arithmetic overflow in reward accounting")]
    Overflow,
}

impl From<TokenError> for RewardError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            TokenError::InsufficientAllowance { needed, available } => {
                Self::InsufficientAllowance { needed, available }
            }
            TokenError::Overflow => Self::Overflow,
        }
    }
}
