use shared_models::{AddressError, CoinError, DecError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewardError {
    #[error("invalid reward program: {0}")]
    InvalidProgramSpec(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("reward program {0} not found")]
    ProgramNotFound(u64),

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("coin error: {0}")]
    Coin(#[from] CoinError),

    #[error("decimal error: {0}")]
    Dec(#[from] DecError),

    #[error("bank transfer failed: {0}")]
    Bank(String),

    #[error("record encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("record not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RewardError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
