//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies the staking engine reads from (currently only the
//! clock) are abstracted behind traits in `staking-types`. This crate provides
//! implementations that return deterministic values and can be controlled
//! programmatically.
//!
//! Usage: swap `SystemClock` for `NullClock` in tests and simulations.

pub mod clock;

pub use clock::NullClock;
