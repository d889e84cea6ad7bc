//! Transaction messages accepted by the engine.
//!
//! Addresses arrive as bech32 strings the way clients submit them, so every
//! request can be checked statelessly with `validate_basic` before it touches
//! the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_models::{AccAddress, Coin};

use crate::models::{
    ClaimAllRewardsDetail, ProgramTerms, QualifyingAction, RewardProgram, RewardProgramClaimDetail,
};
use crate::utils::{Result, RewardError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateRewardProgramRequest {
    pub title: String,
    pub description: String,
    pub distribute_from_address: String,
    pub total_reward_pool: Coin,
    pub max_reward_by_address: Coin,
    pub program_start_time: DateTime<Utc>,
    pub claim_periods: u64,
    pub claim_period_seconds: u64,
    pub max_rollover_claim_periods: u64,
    pub expire_claim_periods: u64,
    pub qualifying_actions: Vec<QualifyingAction>,
}

impl MsgCreateRewardProgramRequest {
    /// Parse the request into program terms.
    pub fn to_terms(&self) -> Result<ProgramTerms> {
        let distribute_from_address = AccAddress::from_bech32(&self.distribute_from_address).map_err(|err| {
            RewardError::InvalidProgramSpec(format!(
                "invalid address for rewards program distribution from address: {err}"
            ))
        })?;

        Ok(ProgramTerms {
            title: self.title.clone(),
            description: self.description.clone(),
            distribute_from_address,
            total_reward_pool: self.total_reward_pool.clone(),
            max_reward_by_address: self.max_reward_by_address.clone(),
            program_start_time: self.program_start_time,
            claim_period_seconds: self.claim_period_seconds,
            claim_periods: self.claim_periods,
            max_rollover_claim_periods: self.max_rollover_claim_periods,
            expire_claim_periods: self.expire_claim_periods,
            qualifying_actions: self.qualifying_actions.clone(),
        })
    }

    pub fn validate_basic(&self) -> Result<()> {
        // Validate as the first program would be; the real id is assigned on creation
        RewardProgram::new(1, self.to_terms()?)?.validate_basic()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateRewardProgramResponse {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEndRewardProgramRequest {
    pub reward_program_id: u64,
    pub program_owner_address: String,
}

impl MsgEndRewardProgramRequest {
    pub fn owner(&self) -> Result<AccAddress> {
        AccAddress::from_bech32(&self.program_owner_address)
            .map_err(|err| RewardError::InvalidRequest(format!("invalid program owner address : {err}")))
    }

    pub fn validate_basic(&self) -> Result<()> {
        if self.reward_program_id == 0 {
            return Err(RewardError::InvalidRequest("invalid reward program id: 0".to_string()));
        }
        self.owner().map(|_| ())
    }
}

fn reward_address(address: &str) -> Result<AccAddress> {
    AccAddress::from_bech32(address)
        .map_err(|err| RewardError::InvalidRequest(format!("invalid reward address : {err}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimRewardsRequest {
    pub reward_program_id: u64,
    pub reward_address: String,
}

impl MsgClaimRewardsRequest {
    pub fn address(&self) -> Result<AccAddress> {
        reward_address(&self.reward_address)
    }

    pub fn validate_basic(&self) -> Result<()> {
        if self.reward_program_id == 0 {
            return Err(RewardError::InvalidRequest("invalid rewards program id : 0".to_string()));
        }
        self.address().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimRewardsResponse {
    pub claim_details: RewardProgramClaimDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAllRewardsRequest {
    pub reward_address: String,
}

impl MsgClaimAllRewardsRequest {
    pub fn address(&self) -> Result<AccAddress> {
        reward_address(&self.reward_address)
    }

    pub fn validate_basic(&self) -> Result<()> {
        self.address().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAllRewardsResponse {
    pub details: ClaimAllRewardsDetail,
}
