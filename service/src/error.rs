use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("reward engine error: {0}")]
    Reward(#[from] staking_rewards::RewardError),

    #[error("token error: {0}")]
    Token(#[from] staking_token::TokenError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
