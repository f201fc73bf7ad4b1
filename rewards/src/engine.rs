//! Core reward accrual engine.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use staking_token::{Asset, FungibleLedger};
use staking_types::{Address, Clock, Timestamp};

use crate::config::PoolConfig;
use crate::custody::Custody;
use crate::error::RewardError;
use crate::event::{EventBus, StakingEvent};
use crate::snapshot::{ParticipantSnapshot, PoolSnapshot};
use crate::state::{ParticipantState, PoolState};

/// The staking pool: settlement, stake/withdraw and reward payout.
///
/// Single writer: every mutating call takes `&mut self` and runs to
/// completion. Each one computes the settled pool and participant first,
/// checks every precondition, moves custody, and only then commits, so an
/// `Err` means nothing changed (balances, accumulator, `last_update_time`).
pub struct RewardEngine<A: Custody = Asset> {
    config: PoolConfig,
    clock: Arc<dyn Clock>,
    pool: PoolState,
    participants: HashMap<Address, ParticipantState>,
    /// Receipt token, minted 1:1 on stake and burned on withdraw.
    receipt: FungibleLedger,
    asset: A,
    events: Vec<StakingEvent>,
    bus: EventBus,
}

impl<A: Custody> RewardEngine<A> {
    /// Create a pool whose accumulator starts at the clock's current reading.
    pub fn new(config: PoolConfig, asset: A, clock: Arc<dyn Clock>) -> Self {
        let genesis = clock.now();
        tracing::info!(
            rate = config.reward_rate,
            owner = %config.owner,
            address = %config.address,
            %genesis,
            "staking pool created"
        );
        Self {
            pool: PoolState::new(u128::from(config.reward_rate), genesis),
            config,
            clock,
            participants: HashMap::new(),
            receipt: FungibleLedger::new(),
            asset,
            events: Vec::new(),
            bus: EventBus::new(),
        }
    }

    // ── Read-only queries ──────────────────────────────────────────────

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The engine's custody account in the external asset.
    pub fn address(&self) -> &Address {
        &self.config.address
    }

    pub fn owner(&self) -> &Address {
        &self.config.owner
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    pub fn total_staked(&self) -> u128 {
        self.pool.total_staked
    }

    pub fn reward_rate(&self) -> u128 {
        self.pool.reward_rate
    }

    pub fn reward_reserve(&self) -> u128 {
        self.pool.reward_reserve
    }

    pub fn reward_per_token_stored(&self) -> u128 {
        self.pool.reward_per_token_stored
    }

    pub fn last_update_time(&self) -> Timestamp {
        self.pool.last_update_time
    }

    /// Accumulator value as of now, without folding it into storage.
    pub fn reward_per_token(&self) -> u128 {
        self.pool.reward_per_token(self.now())
    }

    pub fn staked_balance(&self, participant: &Address) -> u128 {
        self.participants
            .get(participant)
            .map_or(0, |p| p.staked_balance)
    }

    /// Settled reward only; see [`Self::earned`] for the live figure.
    pub fn rewards(&self, participant: &Address) -> u128 {
        self.participants.get(participant).map_or(0, |p| p.rewards)
    }

    /// Settled reward plus everything accrued since the last settlement.
    ///
    /// Pure read: calling it twice with no mutation in between returns the
    /// same value. Saturates instead of failing on overflow.
    pub fn earned(&self, participant: &Address) -> u128 {
        let reward_per_token = self.reward_per_token();
        self.participants.get(participant).map_or(0, |p| {
            p.earned_checked(reward_per_token).unwrap_or(u128::MAX)
        })
    }

    pub fn participant(&self, participant: &Address) -> Option<&ParticipantState> {
        self.participants.get(participant)
    }

    pub fn participants(&self) -> impl Iterator<Item = (&Address, &ParticipantState)> {
        self.participants.iter()
    }

    /// Read-only view of the receipt token. Mint and burn happen only
    /// through [`Self::stake`] and [`Self::withdraw`].
    pub fn receipt(&self) -> &FungibleLedger {
        &self.receipt
    }

    pub fn asset(&self) -> &A {
        &self.asset
    }

    /// The external asset, for owner-side calls such as approvals.
    pub fn asset_mut(&mut self) -> &mut A {
        &mut self.asset
    }

    /// Every event committed so far, oldest first.
    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<StakingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakingEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
        tracing::debug!(listeners = self.bus.listener_count(), "event listener subscribed");
    }

    /// Consistent view of the whole pool at one clock reading.
    pub fn snapshot(&self) -> PoolSnapshot {
        let at = self.now();
        let reward_per_token = self.pool.reward_per_token(at);

        let mut addresses: BTreeSet<&Address> = self.participants.keys().collect();
        addresses.extend(self.receipt.holders().map(|(holder, _)| holder));

        let participants = addresses
            .into_iter()
            .map(|address| {
                let state = self.participants.get(address).cloned().unwrap_or_default();
                ParticipantSnapshot {
                    address: address.clone(),
                    staked_balance: state.staked_balance,
                    rewards: state.rewards,
                    earned: state
                        .earned_checked(reward_per_token)
                        .unwrap_or(u128::MAX),
                    receipt_balance: self.receipt.balance_of(address),
                }
            })
            .collect();

        PoolSnapshot {
            at,
            total_staked: self.pool.total_staked,
            reward_rate: self.pool.reward_rate,
            reward_per_token,
            reward_per_token_stored: self.pool.reward_per_token_stored,
            last_update_time: self.pool.last_update_time,
            reward_reserve: self.pool.reward_reserve,
            custody_balance: self.asset.balance_of(&self.config.address),
            receipt_supply: self.receipt.total_supply(),
            participants,
        }
    }

    // ── Mutating operations ────────────────────────────────────────────

    /// Pull `amount` of the asset from `caller` (via allowance) and stake it.
    pub fn stake(&mut self, caller: &Address, amount: u128) -> Result<(), RewardError> {
        self.try_stake(caller, amount)
            .inspect_err(|e| rejected("stake", caller, e))
    }

    /// Unstake `amount`, burning the same number of receipt units, and send
    /// the asset back to `caller`.
    pub fn withdraw(&mut self, caller: &Address, amount: u128) -> Result<(), RewardError> {
        self.try_withdraw(caller, amount)
            .inspect_err(|e| rejected("withdraw", caller, e))
    }

    /// Pay out everything `caller` has earned so far. Returns the amount paid,
    /// which may be zero.
    pub fn claim_rewards(&mut self, caller: &Address) -> Result<u128, RewardError> {
        self.try_claim(caller)
            .inspect_err(|e| rejected("claim_rewards", caller, e))
    }

    /// Pull `amount` from `funder` (via allowance) into the reward reserve.
    ///
    /// Leaves the accumulator alone: the emission rate does not depend on the
    /// reserve size.
    pub fn fund_rewards(&mut self, funder: &Address, amount: u128) -> Result<(), RewardError> {
        self.try_fund(funder, amount)
            .inspect_err(|e| rejected("fund_rewards", funder, e))
    }

    /// Change the emission rate. Owner only. Accrual up to now is settled at
    /// the old rate.
    pub fn set_reward_rate(&mut self, caller: &Address, rate: u128) -> Result<(), RewardError> {
        self.try_set_rate(caller, rate)
            .inspect_err(|e| rejected("set_reward_rate", caller, e))
    }

    /// Move receipt units. Stake and reward entitlement stay with the
    /// depositor; the receipt is a separate ledger.
    pub fn transfer_receipt(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), RewardError> {
        self.try_transfer_receipt(caller, to, amount)
            .inspect_err(|e| rejected("transfer_receipt", caller, e))
    }

    fn try_stake(&mut self, caller: &Address, amount: u128) -> Result<(), RewardError> {
        self.ensure_external(caller)?;
        if amount == 0 {
            return Err(RewardError::InvalidAmount);
        }
        let now = self.now();
        let (mut pool, mut participant) = self.settle_preview(caller, now)?;
        participant.staked_balance = participant
            .staked_balance
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;

        self.asset.pull(&self.config.address, caller, amount)?;
        // Receipt supply equals total_staked, which was just checked.
        let minted = self.receipt.mint(caller, amount)?;
        self.commit(caller, pool, participant);

        tracing::info!(participant = %caller, amount, total_staked = self.pool.total_staked, "staked");
        self.emit(StakingEvent::Staked {
            participant: caller.clone(),
            amount,
        });
        self.emit(minted.into());
        Ok(())
    }

    fn try_withdraw(&mut self, caller: &Address, amount: u128) -> Result<(), RewardError> {
        if amount == 0 {
            return Err(RewardError::InvalidAmount);
        }
        let staked = self.staked_balance(caller);
        if amount > staked {
            return Err(RewardError::ExceedsStake {
                requested: amount,
                staked,
            });
        }
        self.receipt.ensure_balance(caller, amount)?;

        let now = self.now();
        let (mut pool, mut participant) = self.settle_preview(caller, now)?;
        participant.staked_balance -= amount;
        pool.total_staked -= amount;

        self.asset.push(&self.config.address, caller, amount)?;
        let burned = self.receipt.burn(caller, amount)?;
        self.commit(caller, pool, participant);

        tracing::info!(participant = %caller, amount, total_staked = self.pool.total_staked, "withdrawn");
        self.emit(StakingEvent::Withdrawn {
            participant: caller.clone(),
            amount,
        });
        self.emit(burned.into());
        Ok(())
    }

    fn try_claim(&mut self, caller: &Address) -> Result<u128, RewardError> {
        let now = self.now();
        let (mut pool, mut participant) = self.settle_preview(caller, now)?;
        let owed = participant.rewards;
        if owed > pool.reward_reserve {
            return Err(RewardError::InsufficientReserve {
                needed: owed,
                available: pool.reward_reserve,
            });
        }
        pool.reward_reserve -= owed;
        participant.rewards = 0;

        if owed > 0 {
            self.asset.push(&self.config.address, caller, owed)?;
        }
        self.commit(caller, pool, participant);

        tracing::info!(participant = %caller, amount = owed, reserve = self.pool.reward_reserve, "reward claimed");
        self.emit(StakingEvent::RewardClaimed {
            participant: caller.clone(),
            amount: owed,
        });
        Ok(owed)
    }

    fn try_fund(&mut self, funder: &Address, amount: u128) -> Result<(), RewardError> {
        self.ensure_external(funder)?;
        if amount == 0 {
            return Err(RewardError::InvalidAmount);
        }
        let reserve = self
            .pool
            .reward_reserve
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;

        self.asset.pull(&self.config.address, funder, amount)?;
        self.pool.reward_reserve = reserve;

        tracing::info!(%funder, amount, reserve, "rewards funded");
        self.emit(StakingEvent::RewardsFunded {
            funder: funder.clone(),
            amount,
        });
        Ok(())
    }

    fn try_set_rate(&mut self, caller: &Address, rate: u128) -> Result<(), RewardError> {
        if *caller != self.config.owner {
            return Err(RewardError::Unauthorized {
                caller: caller.clone(),
            });
        }
        let horizon = self.config.solvency_horizon_secs;
        if horizon > 0 {
            let needed = rate
                .checked_mul(u128::from(horizon))
                .ok_or(RewardError::Overflow)?;
            if needed > self.pool.reward_reserve {
                return Err(RewardError::InsufficientReserve {
                    needed,
                    available: self.pool.reward_reserve,
                });
            }
        }
        let now = self.now();
        let mut pool = self.pool.advanced(now).ok_or(RewardError::Overflow)?;
        let old_rate = pool.reward_rate;
        pool.reward_rate = rate;
        self.pool = pool;

        tracing::info!(old_rate, new_rate = rate, "reward rate updated");
        self.emit(StakingEvent::RewardRateUpdated {
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    fn try_transfer_receipt(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), RewardError> {
        let record = self.receipt.transfer(caller, to, amount)?;
        tracing::info!(from = %caller, %to, amount, "receipt transferred");
        self.emit(record.into());
        Ok(())
    }

    /// Pulling from the custody account into itself moves nothing, so the
    /// custody account may not act as a depositor or funder.
    fn ensure_external(&self, caller: &Address) -> Result<(), RewardError> {
        if *caller == self.config.address {
            return Err(RewardError::CustodyAccount {
                account: caller.clone(),
            });
        }
        Ok(())
    }

    // ── Settlement ─────────────────────────────────────────────────────

    /// The pool advanced to `now` and `who` settled against it, uncommitted.
    fn settle_preview(
        &self,
        who: &Address,
        now: Timestamp,
    ) -> Result<(PoolState, ParticipantState), RewardError> {
        let pool = self.pool.advanced(now).ok_or(RewardError::Overflow)?;
        let participant = self
            .participants
            .get(who)
            .cloned()
            .unwrap_or_default()
            .settled(pool.reward_per_token_stored)
            .ok_or(RewardError::Overflow)?;
        Ok((pool, participant))
    }

    fn commit(&mut self, who: &Address, pool: PoolState, participant: ParticipantState) {
        tracing::debug!(
            participant = %who,
            reward_per_token = pool.reward_per_token_stored,
            rewards = participant.rewards,
            "settled"
        );
        self.pool = pool;
        // Participants appear on first stake, not on an empty claim.
        let untouched = participant.staked_balance == 0 && participant.rewards == 0;
        if untouched && !self.participants.contains_key(who) {
            return;
        }
        self.participants.insert(who.clone(), participant);
    }

    fn emit(&mut self, event: StakingEvent) {
        self.bus.emit(&event);
        self.events.push(event);
    }
}

fn rejected(op: &'static str, caller: &Address, err: &RewardError) {
    tracing::warn!(op, %caller, error = %err, "operation rejected");
}
