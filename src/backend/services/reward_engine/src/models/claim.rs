use serde::{Deserialize, Serialize};
use shared_models::Coin;

use crate::models::account_state::ClaimStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedRewardPeriodDetail {
    pub claim_period_id: u64,
    /// Shares the claimant earned in the period.
    pub total_shares: u64,
    pub claim_period_reward: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardProgramClaimDetail {
    pub reward_program_id: u64,
    pub total_reward_claim: Coin,
    pub claimed_reward_period_details: Vec<ClaimedRewardPeriodDetail>,
}

impl RewardProgramClaimDetail {
    pub fn is_empty(&self) -> bool {
        self.claimed_reward_period_details.is_empty()
    }
}

/// Result of claiming across every program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAllRewardsDetail {
    pub claim_details: Vec<RewardProgramClaimDetail>,
    /// One entry per denomination, in first-seen order.
    pub total_reward_claim: Vec<Coin>,
}

/// What an address is owed by one claim period, as reported by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccountResponse {
    pub reward_program_id: u64,
    pub total_reward_claim: Coin,
    pub claim_status: ClaimStatus,
    pub claim_id: u64,
}
