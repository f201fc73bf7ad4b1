//! Point-in-time, serializable views of the pool.

use serde::{Deserialize, Serialize};
use staking_types::{Address, Timestamp};

/// One participant as seen at the snapshot instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub address: Address,
    pub staked_balance: u128,
    /// Settled reward only.
    pub rewards: u128,
    /// Settled plus accrued-but-unsettled reward.
    pub earned: u128,
    pub receipt_balance: u128,
}

/// The whole pool at one instant, with every derived value computed against
/// the same `at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub at: Timestamp,
    pub total_staked: u128,
    pub reward_rate: u128,
    pub reward_per_token: u128,
    pub reward_per_token_stored: u128,
    pub last_update_time: Timestamp,
    pub reward_reserve: u128,
    /// The engine's balance in the external asset.
    pub custody_balance: u128,
    pub receipt_supply: u128,
    /// Sorted by address.
    pub participants: Vec<ParticipantSnapshot>,
}

impl PoolSnapshot {
    pub fn participant(&self, address: &Address) -> Option<&ParticipantSnapshot> {
        self.participants.iter().find(|p| &p.address == address)
    }

    /// Sum of `earned` across participants.
    pub fn total_earned(&self) -> u128 {
        self.participants
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.earned))
    }
}
