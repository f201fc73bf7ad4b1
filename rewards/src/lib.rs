//! Staking rewards: the reward accrual engine.
//!
//! A fixed reward rate is streamed every second and split across all staked
//! principal in proportion to stake. The engine keeps one global accumulator,
//! reward per staked unit scaled by [`SCALE`], and settles each participant
//! against it before their stake changes:
//!
//! `earned(p) = rewards(p) + staked(p) × (reward_per_token(now) − paid(p)) / SCALE`
//!
//! This crate handles:
//! - Accumulator advancement and per-participant settlement
//! - Stake / withdraw / claim with all-or-nothing custody moves
//! - Reward funding and owner-only rate changes
//! - Receipt token mint/burn/transfer and the event stream

pub mod config;
pub mod custody;
pub mod engine;
pub mod error;
pub mod event;
pub mod snapshot;
pub mod state;

pub use config::PoolConfig;
pub use custody::Custody;
pub use engine::RewardEngine;
pub use error::RewardError;
pub use event::{EventBus, StakingEvent};
pub use snapshot::{ParticipantSnapshot, PoolSnapshot};
pub use state::{ParticipantState, PoolState, SCALE};
