use serde::{Deserialize, Serialize};
use shared_models::Coin;

/// Pool and share totals of one claim period of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPeriodRewardDistribution {
    pub claim_period_id: u64,
    pub reward_program_id: u64,
    pub rewards_pool: Coin,
    /// Sum of the participant rewards, fixed when the period ends.
    pub total_rewards_pool_for_claim_period: Coin,
    pub total_shares: u64,
    pub claim_period_ended: bool,
}

impl ClaimPeriodRewardDistribution {
    pub fn new(claim_period_id: u64, reward_program_id: u64, rewards_pool: Coin) -> Self {
        let denom = rewards_pool.denom.clone();
        Self {
            claim_period_id,
            reward_program_id,
            rewards_pool,
            total_rewards_pool_for_claim_period: Coin::zero(denom),
            total_shares: 0,
            claim_period_ended: false,
        }
    }
}
