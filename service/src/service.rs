//! Serialized access to one reward engine.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::Instrument;

use staking_rewards::{PoolSnapshot, RewardEngine, RewardError, StakingEvent};
use staking_token::Asset;
use staking_types::{Address, Clock};

use crate::config::ServiceConfig;
use crate::tracing_spans::{operation_span, query_span};
use crate::ServiceError;

/// Cloneable handle to a shared staking pool.
///
/// Mutations hold the write lock for the whole engine call, so no operation
/// ever observes another half-applied. Queries take the read lock and run
/// concurrently with each other.
#[derive(Clone)]
pub struct StakingService {
    engine: Arc<RwLock<RewardEngine>>,
}

impl StakingService {
    pub fn new(engine: RewardEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    /// Build a fresh pool and asset from configuration.
    pub fn from_config(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let asset = Asset::new(config.asset_name.clone(), config.asset_symbol.clone());
        Self::new(RewardEngine::new(config.pool.clone(), asset, clock))
    }

    // ── Pool operations ────────────────────────────────────────────────

    pub async fn stake(&self, caller: &Address, amount: u128) -> Result<(), ServiceError> {
        self.write("stake", caller, |e| e.stake(caller, amount)).await
    }

    pub async fn withdraw(&self, caller: &Address, amount: u128) -> Result<(), ServiceError> {
        self.write("withdraw", caller, |e| e.withdraw(caller, amount))
            .await
    }

    pub async fn claim_rewards(&self, caller: &Address) -> Result<u128, ServiceError> {
        self.write("claim_rewards", caller, |e| e.claim_rewards(caller))
            .await
    }

    pub async fn fund_rewards(&self, funder: &Address, amount: u128) -> Result<(), ServiceError> {
        self.write("fund_rewards", funder, |e| e.fund_rewards(funder, amount))
            .await
    }

    pub async fn set_reward_rate(&self, caller: &Address, rate: u128) -> Result<(), ServiceError> {
        self.write("set_reward_rate", caller, |e| e.set_reward_rate(caller, rate))
            .await
    }

    pub async fn transfer_receipt(
        &self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ServiceError> {
        self.write("transfer_receipt", caller, |e| {
            e.transfer_receipt(caller, to, amount)
        })
        .await
    }

    // ── External asset (caller side) ───────────────────────────────────

    /// Issue asset units to `to`.
    pub async fn mint(&self, to: &Address, amount: u128) -> Result<(), ServiceError> {
        let mut engine = self.engine.write().await;
        engine.asset_mut().mint(to, amount)?;
        Ok(())
    }

    /// `owner` authorizes the pool to pull up to `amount`.
    pub async fn approve(&self, owner: &Address, amount: u128) {
        let mut engine = self.engine.write().await;
        let pool = engine.address().clone();
        engine.asset_mut().approve(owner, &pool, amount);
    }

    pub async fn asset_balance(&self, holder: &Address) -> u128 {
        self.read("asset_balance", |e| e.asset().balance_of(holder))
            .await
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub async fn earned(&self, participant: &Address) -> u128 {
        self.read("earned", |e| e.earned(participant)).await
    }

    pub async fn staked_balance(&self, participant: &Address) -> u128 {
        self.read("staked_balance", |e| e.staked_balance(participant))
            .await
    }

    pub async fn rewards(&self, participant: &Address) -> u128 {
        self.read("rewards", |e| e.rewards(participant)).await
    }

    pub async fn total_staked(&self) -> u128 {
        self.read("total_staked", |e| e.total_staked()).await
    }

    pub async fn reward_per_token(&self) -> u128 {
        self.read("reward_per_token", |e| e.reward_per_token()).await
    }

    pub async fn receipt_balance(&self, holder: &Address) -> u128 {
        self.read("receipt_balance", |e| e.receipt().balance_of(holder))
            .await
    }

    pub async fn snapshot(&self) -> PoolSnapshot {
        self.read("snapshot", |e| e.snapshot()).await
    }

    pub async fn drain_events(&self) -> Vec<StakingEvent> {
        self.engine.write().await.drain_events()
    }

    pub async fn subscribe(&self, listener: Box<dyn Fn(&StakingEvent) + Send + Sync>) {
        self.engine.write().await.subscribe(listener);
    }

    // ── Lock helpers ───────────────────────────────────────────────────

    async fn write<R>(
        &self,
        op: &str,
        caller: &Address,
        f: impl FnOnce(&mut RewardEngine) -> Result<R, RewardError>,
    ) -> Result<R, ServiceError> {
        async {
            let mut engine = self.engine.write().await;
            Ok(f(&mut *engine)?)
        }
        .instrument(operation_span(op, caller.as_str()))
        .await
    }

    async fn read<R>(&self, query: &str, f: impl FnOnce(&RewardEngine) -> R) -> R {
        async {
            let engine = self.engine.read().await;
            f(&*engine)
        }
        .instrument(query_span(query))
        .await
    }
}
