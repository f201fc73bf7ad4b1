//! Fundamental types for the staking pool.
//!
//! Shared by every other crate in the workspace: participant addresses,
//! timestamps and the time source abstraction the accrual engine reads "now" from.

pub mod address;
pub mod time;

pub use address::Address;
pub use time::{Clock, SystemClock, Timestamp};
