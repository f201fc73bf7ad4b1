use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use staking_nullables::NullClock;
use staking_rewards::{ParticipantState, PoolConfig, PoolState, RewardEngine, SCALE};
use staking_token::Asset;
use staking_types::{Address, Timestamp};

fn bench_reward_per_token(c: &mut Criterion) {
    let mut pool = PoolState::new(1_000, Timestamp::new(0));
    pool.total_staked = 123_456_789;
    pool.reward_per_token_stored = SCALE * 42;

    c.bench_function("reward_per_token_checked", |b| {
        b.iter(|| black_box(pool.reward_per_token_checked(black_box(Timestamp::new(86_400)))));
    });

    let participant = ParticipantState {
        staked_balance: 1_000_000,
        reward_per_token_paid: SCALE,
        rewards: 17,
    };
    c.bench_function("participant_settled", |b| {
        b.iter(|| black_box(participant.settled(black_box(SCALE * 3))));
    });
}

fn engine_with_stakers(n: usize) -> (Arc<NullClock>, RewardEngine, Vec<Address>) {
    let clock = Arc::new(NullClock::new(0));
    let config = PoolConfig::default();
    let owner = config.owner.clone();
    let mut asset = Asset::new("Stake Token", "STK");
    asset.mint(&owner, u64::MAX as u128).unwrap();
    let stakers: Vec<Address> = (0..n).map(|i| Address::new(format!("staker_{i}"))).collect();
    for s in &stakers {
        asset.mint(s, 1_000_000).unwrap();
    }
    let mut engine = RewardEngine::new(config, asset, clock.clone());
    let pool = engine.address().clone();
    engine.asset_mut().approve(&owner, &pool, u64::MAX as u128);
    engine.fund_rewards(&owner, u64::MAX as u128).unwrap();
    for s in &stakers {
        engine.asset_mut().approve(s, &pool, u128::MAX);
        engine.stake(s, 1_000).unwrap();
        clock.advance(1);
    }
    (clock, engine, stakers)
}

fn bench_engine_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    for stakers in [10, 1_000, 10_000] {
        let (clock, mut engine, addrs) = engine_with_stakers(stakers);
        let who = addrs[0].clone();

        group.bench_with_input(BenchmarkId::new("earned", stakers), &stakers, |b, _| {
            b.iter(|| black_box(engine.earned(black_box(&who))));
        });

        group.bench_with_input(BenchmarkId::new("stake_then_withdraw", stakers), &stakers, |b, _| {
            b.iter(|| {
                clock.advance(1);
                engine.stake(&who, 10).unwrap();
                engine.withdraw(&who, 10).unwrap();
                engine.drain_events();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reward_per_token, bench_engine_operations);
criterion_main!(benches);
