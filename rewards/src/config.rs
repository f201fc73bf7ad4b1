//! Pool construction parameters.

use serde::{Deserialize, Serialize};
use staking_types::Address;

/// Parameters fixed when a pool is created.
///
/// The rate is `u64` here because TOML integers are 64-bit; the engine widens
/// it to `u128` internally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Reward units emitted per second across all stake.
    #[serde(default = "default_reward_rate")]
    pub reward_rate: u64,

    /// The only account allowed to change the reward rate.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// The engine's own account in the external asset.
    #[serde(default = "default_address")]
    pub address: Address,

    /// Seconds of emission the reserve must cover before a rate change is
    /// accepted. `0` disables the check.
    #[serde(default)]
    pub solvency_horizon_secs: u64,
}

fn default_reward_rate() -> u64 {
    10
}

fn default_owner() -> Address {
    Address::new("owner")
}

fn default_address() -> Address {
    Address::new("staking_pool")
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            reward_rate: default_reward_rate(),
            owner: default_owner(),
            address: default_address(),
            solvency_horizon_secs: 0,
        }
    }
}
