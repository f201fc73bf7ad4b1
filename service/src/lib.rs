//! Staking pool service.
//!
//! Wraps a [`RewardEngine`](staking_rewards::RewardEngine) for use from many
//! concurrent callers: every mutation runs under one write lock, reads share
//! a read lock and always observe a fully committed pool. Also owns the
//! ambient pieces around the engine: TOML configuration and log setup.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod tracing_spans;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use logging::{init_logging, LogFormat};
pub use service::StakingService;
