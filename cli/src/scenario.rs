//! JSON scenarios: a start time plus an ordered list of pool operations.
//!
//! Each step runs against a [`StakingService`] whose clock only moves on an
//! explicit `advance`, so reward figures are exact and reproducible.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use staking_nullables::NullClock;
use staking_rewards::{PoolSnapshot, StakingEvent};
use staking_service::StakingService;
use staking_types::{Address, Clock, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Clock reading before the first step, in seconds.
    #[serde(default = "default_start")]
    pub start: u64,
    pub steps: Vec<Step>,
}

fn default_start() -> u64 {
    1_700_000_000
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// The step must be rejected. A rejected step leaves the pool untouched
    /// and the run continues.
    #[serde(default)]
    pub expect_failure: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Mint { to: Address, amount: u128 },
    /// `owner` lets the pool pull up to `amount` of the asset.
    Approve { owner: Address, amount: u128 },
    Stake { who: Address, amount: u128 },
    Withdraw { who: Address, amount: u128 },
    Claim { who: Address },
    Fund { who: Address, amount: u128 },
    SetRate { who: Address, rate: u128 },
    Transfer { from: Address, to: Address, amount: u128 },
    Advance { secs: u64 },
    ExpectEarned { who: Address, amount: u128 },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Approve { .. } => "approve",
            Self::Stake { .. } => "stake",
            Self::Withdraw { .. } => "withdraw",
            Self::Claim { .. } => "claim",
            Self::Fund { .. } => "fund",
            Self::SetRate { .. } => "set_rate",
            Self::Transfer { .. } => "transfer",
            Self::Advance { .. } => "advance",
            Self::ExpectEarned { .. } => "expect_earned",
        }
    }

    /// Every account this step names.
    pub fn addresses(&self) -> Vec<&Address> {
        match self {
            Self::Mint { to: who, .. }
            | Self::Approve { owner: who, .. }
            | Self::Stake { who, .. }
            | Self::Withdraw { who, .. }
            | Self::Claim { who }
            | Self::Fund { who, .. }
            | Self::SetRate { who, .. }
            | Self::ExpectEarned { who, .. } => vec![who],
            Self::Transfer { from, to, .. } => vec![from, to],
            Self::Advance { .. } => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub at: Timestamp,
    /// Amount paid out, for claims.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed: Option<u128>,
    /// Rejection reason, for steps marked `expect_failure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub steps: Vec<StepOutcome>,
    pub events: Vec<StakingEvent>,
    pub snapshot: PoolSnapshot,
}

impl Scenario {
    /// Parse and check that every named account is well-formed.
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_json::from_str(s).context("invalid scenario")?;
        for (index, step) in scenario.steps.iter().enumerate() {
            if let Some(bad) = step.action.addresses().into_iter().find(|a| !a.is_valid()) {
                bail!("step {index} ({}): malformed address {:?}", step.action.name(), bad.as_str());
            }
        }
        Ok(scenario)
    }
}

/// Replay every step in order. Stops at the first step whose result does not
/// match its expectation.
pub async fn run(
    service: &StakingService,
    clock: &NullClock,
    scenario: &Scenario,
) -> anyhow::Result<Report> {
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let op = step.action.name();
        let at = clock.now();
        let result = apply(service, clock, &step.action).await;

        let (claimed, rejected) = match (result, step.expect_failure) {
            (Ok(claimed), false) => (claimed, None),
            (Err(e), true) => {
                tracing::debug!(index, op, error = %e, "step rejected as expected");
                (None, Some(e.to_string()))
            }
            (Ok(_), true) => bail!("step {index} ({op}) succeeded but was expected to fail"),
            (Err(e), false) => return Err(e.context(format!("step {index} ({op}) failed"))),
        };
        steps.push(StepOutcome {
            index,
            op,
            at,
            claimed,
            rejected,
        });
    }

    Ok(Report {
        steps,
        events: service.drain_events().await,
        snapshot: service.snapshot().await,
    })
}

async fn apply(
    service: &StakingService,
    clock: &NullClock,
    action: &Action,
) -> anyhow::Result<Option<u128>> {
    match action {
        Action::Mint { to, amount } => service.mint(to, *amount).await?,
        Action::Approve { owner, amount } => service.approve(owner, *amount).await,
        Action::Stake { who, amount } => service.stake(who, *amount).await?,
        Action::Withdraw { who, amount } => service.withdraw(who, *amount).await?,
        Action::Claim { who } => return Ok(Some(service.claim_rewards(who).await?)),
        Action::Fund { who, amount } => service.fund_rewards(who, *amount).await?,
        Action::SetRate { who, rate } => service.set_reward_rate(who, *rate).await?,
        Action::Transfer { from, to, amount } => {
            service.transfer_receipt(from, to, *amount).await?
        }
        Action::Advance { secs } => clock.advance(*secs),
        Action::ExpectEarned { who, amount } => {
            let earned = service.earned(who).await;
            if earned != *amount {
                bail!("{who} has earned {earned}, expected {amount}");
            }
        }
    }
    Ok(None)
}
