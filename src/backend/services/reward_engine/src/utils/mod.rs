pub mod errors;
pub mod math;

pub use errors::{ConfigError, Result, RewardError};
