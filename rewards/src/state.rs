//! Pool-wide accumulator state and per-participant settlement state.
//!
//! Everything here is plain data with pure, checked arithmetic. The engine
//! computes the next state with these helpers, validates, and only then
//! commits, so a rejected operation never leaves a half-advanced pool.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use staking_types::Timestamp;

/// Fixed-point multiplier for the reward-per-token accumulator.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Global pool accounting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Sum of every participant's staked principal.
    pub total_staked: u128,
    /// Reward units emitted per second across all stake.
    pub reward_rate: u128,
    /// Cumulative reward per staked unit since inception, scaled by [`SCALE`],
    /// as of `last_update_time`.
    pub reward_per_token_stored: u128,
    /// When the accumulator was last folded forward. Never moves backwards.
    pub last_update_time: Timestamp,
    /// Reward asset held in custody for payouts.
    pub reward_reserve: u128,
}

impl PoolState {
    pub fn new(reward_rate: u128, genesis: Timestamp) -> Self {
        Self {
            total_staked: 0,
            reward_rate,
            reward_per_token_stored: 0,
            last_update_time: genesis,
            reward_reserve: 0,
        }
    }

    /// Accumulator value at `now` without mutating anything.
    ///
    /// With nothing staked the accumulator stalls: no reward is attributed
    /// and there is nothing to divide by.
    pub fn reward_per_token_checked(&self, now: Timestamp) -> Option<u128> {
        if self.total_staked == 0 {
            return Some(self.reward_per_token_stored);
        }
        let elapsed = self.last_update_time.elapsed_since(now);
        let emitted = U256::from(self.reward_rate).checked_mul(U256::from(elapsed))?;
        let delta = emitted.checked_mul(U256::from(SCALE))? / U256::from(self.total_staked);
        self.reward_per_token_stored.checked_add(narrow(delta)?)
    }

    /// Accumulator value at `now`, saturating on overflow.
    pub fn reward_per_token(&self, now: Timestamp) -> u128 {
        self.reward_per_token_checked(now).unwrap_or(u128::MAX)
    }

    /// The pool folded forward to `now`.
    ///
    /// A `now` earlier than `last_update_time` counts as zero elapsed time and
    /// keeps the existing timestamp.
    pub fn advanced(&self, now: Timestamp) -> Option<Self> {
        let reward_per_token_stored = self.reward_per_token_checked(now)?;
        Some(Self {
            reward_per_token_stored,
            last_update_time: self.last_update_time.max(now),
            ..self.clone()
        })
    }
}

/// Per-participant accounting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantState {
    /// Current staked principal.
    pub staked_balance: u128,
    /// Accumulator snapshot at the last settlement (high-water mark).
    pub reward_per_token_paid: u128,
    /// Settled but unclaimed reward.
    pub rewards: u128,
}

impl ParticipantState {
    /// Reward accrued since the last settlement, given the accumulator value.
    pub fn pending_checked(&self, reward_per_token: u128) -> Option<u128> {
        let delta = reward_per_token.saturating_sub(self.reward_per_token_paid);
        let pending = U256::from(self.staked_balance).checked_mul(U256::from(delta))?;
        narrow(pending / U256::from(SCALE))
    }

    /// Settled plus pending reward.
    pub fn earned_checked(&self, reward_per_token: u128) -> Option<u128> {
        self.rewards
            .checked_add(self.pending_checked(reward_per_token)?)
    }

    /// This participant with pending accrual folded into `rewards` and the
    /// high-water mark moved to `reward_per_token`.
    pub fn settled(&self, reward_per_token: u128) -> Option<Self> {
        Some(Self {
            staked_balance: self.staked_balance,
            reward_per_token_paid: reward_per_token,
            rewards: self.earned_checked(reward_per_token)?,
        })
    }
}

/// Products are formed in 256 bits; only the quotient has to fit back.
fn narrow(value: U256) -> Option<u128> {
    (value <= U256::from(u128::MAX)).then(|| value.low_u128())
}
