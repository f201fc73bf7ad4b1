//! Events emitted by committed pool operations.

use serde::{Deserialize, Serialize};
use staking_token::TransferRecord;
use staking_types::Address;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StakingEvent {
    /// Principal entered the pool.
    Staked { participant: Address, amount: u128 },
    /// Principal left the pool.
    Withdrawn { participant: Address, amount: u128 },
    /// Settled reward was paid out (possibly zero).
    RewardClaimed { participant: Address, amount: u128 },
    /// The reward reserve was topped up.
    RewardsFunded { funder: Address, amount: u128 },
    /// The emission rate changed.
    RewardRateUpdated { old_rate: u128, new_rate: u128 },
    /// A receipt-token movement. Mints have no `from`, burns have no `to`.
    Transfer {
        from: Option<Address>,
        to: Option<Address>,
        amount: u128,
    },
}

impl From<TransferRecord> for StakingEvent {
    fn from(record: TransferRecord) -> Self {
        Self::Transfer {
            from: record.from,
            to: record.to,
            amount: record.amount,
        }
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the thread that commits the operation, while the
/// engine is still borrowed mutably; keep handlers fast and never call back
/// into the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&StakingEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakingEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &StakingEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
