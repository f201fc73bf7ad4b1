use std::sync::Arc;

use proptest::prelude::*;

use staking_nullables::NullClock;
use staking_rewards::{PoolConfig, RewardEngine, RewardError};
use staking_token::Asset;
use staking_types::{Address, Clock};

const PARTICIPANTS: u8 = 3;

fn participant(i: u8) -> Address {
    Address::new(format!("staker_{i}"))
}

#[derive(Clone, Debug)]
enum Op {
    Stake(u8, u128),
    Withdraw(u8, u128),
    Claim(u8),
    Transfer(u8, u8, u128),
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..PARTICIPANTS, 0u128..5_000).prop_map(|(p, a)| Op::Stake(p, a)),
        (0..PARTICIPANTS, 0u128..5_000).prop_map(|(p, a)| Op::Withdraw(p, a)),
        (0..PARTICIPANTS).prop_map(Op::Claim),
        (0..PARTICIPANTS, 0..PARTICIPANTS, 0u128..2_000).prop_map(|(f, t, a)| Op::Transfer(f, t, a)),
        (0u64..500).prop_map(Op::Advance),
    ]
}

fn deploy(rate: u64) -> (Arc<NullClock>, RewardEngine) {
    let clock = Arc::new(NullClock::new(1_000));
    let config = PoolConfig {
        reward_rate: rate,
        ..PoolConfig::default()
    };
    let owner = config.owner.clone();
    let mut asset = Asset::new("Stake Token", "STK");
    asset.mint(&owner, 1_000_000_000_000).unwrap();
    for i in 0..PARTICIPANTS {
        asset.mint(&participant(i), 100_000).unwrap();
    }
    let mut engine = RewardEngine::new(config, asset, clock.clone());
    let pool = engine.address().clone();
    engine.asset_mut().approve(&owner, &pool, 1_000_000_000_000);
    engine.fund_rewards(&owner, 1_000_000_000_000).unwrap();
    for i in 0..PARTICIPANTS {
        engine.asset_mut().approve(&participant(i), &pool, u128::MAX);
    }
    (clock, engine)
}

fn apply(engine: &mut RewardEngine, clock: &NullClock, op: &Op) -> Result<u128, RewardError> {
    match *op {
        Op::Stake(p, a) => engine.stake(&participant(p), a).map(|_| 0),
        Op::Withdraw(p, a) => engine.withdraw(&participant(p), a).map(|_| 0),
        Op::Claim(p) => engine.claim_rewards(&participant(p)),
        Op::Transfer(f, t, a) => engine
            .transfer_receipt(&participant(f), &participant(t), a)
            .map(|_| 0),
        Op::Advance(secs) => {
            clock.advance(secs);
            Ok(0)
        }
    }
}

proptest! {
    /// Stake, receipt supply and custody stay in balance after every step.
    #[test]
    fn conservation_holds(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let (clock, mut engine) = deploy(10);
        for op in &ops {
            let _ = apply(&mut engine, &clock, op);

            let sum: u128 = (0..PARTICIPANTS).map(|i| engine.staked_balance(&participant(i))).sum();
            prop_assert_eq!(sum, engine.total_staked());
            prop_assert_eq!(engine.receipt().total_supply(), engine.total_staked());
            let custody = engine.asset().balance_of(engine.address());
            prop_assert_eq!(custody, engine.total_staked() + engine.reward_reserve());
        }
    }

    /// The accumulator never decreases and its timestamp never passes the clock.
    #[test]
    fn accumulator_is_monotonic(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let (clock, mut engine) = deploy(7);
        let mut last = engine.reward_per_token_stored();
        for op in &ops {
            let _ = apply(&mut engine, &clock, op);
            prop_assert!(engine.reward_per_token_stored() >= last);
            prop_assert!(engine.last_update_time() <= clock.now());
            last = engine.reward_per_token_stored();
        }
    }

    /// A rejected operation leaves the pool exactly as it was.
    #[test]
    fn failed_operations_change_nothing(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let (clock, mut engine) = deploy(10);
        for op in &ops {
            let before = engine.snapshot();
            if apply(&mut engine, &clock, op).is_err() {
                prop_assert_eq!(engine.snapshot(), before);
            }
        }
    }

    /// Everything paid out or still owed never exceeds what the rate emitted
    /// while something was staked, and truncation loses at most a few units
    /// per operation.
    #[test]
    fn distribution_is_bounded_by_emission(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let rate = 10u128;
        let (clock, mut engine) = deploy(rate as u64);
        let mut emitted = 0u128;
        let mut claimed = 0u128;
        for op in &ops {
            if let Op::Advance(secs) = op {
                if engine.total_staked() > 0 {
                    emitted += rate * u128::from(*secs);
                }
            }
            if let Ok(paid) = apply(&mut engine, &clock, op) {
                claimed += paid;
            }
        }
        let owed: u128 = (0..PARTICIPANTS).map(|i| engine.earned(&participant(i))).sum();
        prop_assert!(claimed + owed <= emitted);
        let residue = emitted - (claimed + owed);
        prop_assert!(residue <= 3 * ops.len() as u128 + 3, "residue {} too large", residue);
    }

    /// Once a participant is fully out, their earned figure is frozen.
    #[test]
    fn accrual_stops_on_exit(amount in 1u128..10_000, before in 1u64..1_000, after in 1u64..10_000) {
        let (clock, mut engine) = deploy(10);
        let who = participant(0);
        engine.stake(&who, amount).unwrap();
        clock.advance(before);
        engine.withdraw(&who, amount).unwrap();
        let frozen = engine.earned(&who);
        clock.advance(after);
        prop_assert_eq!(engine.earned(&who), frozen);
        prop_assert_eq!(engine.rewards(&who), frozen);
    }

    /// A lone staker earns the full emission regardless of stake size, up to truncation.
    #[test]
    fn lone_staker_earns_full_emission(amount in 1u128..1_000_000, secs in 0u64..100_000, rate in 0u64..1_000) {
        let (clock, mut engine) = deploy(rate);
        let who = participant(1);
        engine.stake(&who, amount.min(100_000)).unwrap();
        clock.advance(secs);
        let expected = u128::from(rate) * u128::from(secs);
        let earned = engine.earned(&who);
        prop_assert!(earned <= expected);
        prop_assert!(expected - earned <= 1);
    }
}
