//! Reward program engine.
//!
//! Funded reward programs pay accounts for qualifying on-chain actions
//! (delegating, voting, transferring). Each block the engine advances program
//! lifecycles in `begin_blocker`, detects and scores qualifying actions from
//! the block's event log in `end_blocker`, and settles claims on request.

pub mod api;
pub mod config;
pub mod context;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::RewardConfig;
pub use context::Context;
pub use repositories::{BankKeeper, KvStore, MemoryStore, RewardRepository, StakingKeeper};
pub use services::{EpochHooks, GovHooks, RewardKeeper};
pub use utils::{Result, RewardError};
