//! staking-sim: replay staking scenarios against an in-memory pool.

mod scenario;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use staking_nullables::NullClock;
use staking_service::{init_logging, LogFormat, ServiceConfig, StakingService};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "staking-sim", about = "Staking pool reward simulator")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "STAKING_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "STAKING_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "STAKING_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Reward units emitted per second.
    #[arg(long, global = true, env = "STAKING_REWARD_RATE")]
    reward_rate: Option<u64>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario and print the report as JSON.
    Run {
        /// Scenario file.
        scenario: PathBuf,

        /// Single-line JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
    /// Print the default configuration as TOML.
    DefaultConfig,
}

impl Cli {
    /// File (or default) configuration with command-line overrides applied.
    fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(rate) = self.reward_rate {
            config.pool.reward_rate = rate;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.service_config()?;
    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Run { scenario: path, compact } => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            let plan = Scenario::from_json(&contents)?;
            tracing::info!(
                "Replaying {} steps from {} (rate {}/s)",
                plan.steps.len(),
                path.display(),
                config.pool.reward_rate,
            );

            let clock = Arc::new(NullClock::new(plan.start));
            let service = StakingService::from_config(&config, clock.clone());
            let report = scenario::run(&service, &clock, &plan).await?;

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }
        Command::DefaultConfig => {
            print!("{}", ServiceConfig::default().to_toml_string()?);
        }
    }
    Ok(())
}
