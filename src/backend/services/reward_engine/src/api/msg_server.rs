use std::sync::Arc;

use shared_models::AbciEvent;
use tracing::info;

use crate::api::msgs::{
    MsgClaimAllRewardsRequest, MsgClaimAllRewardsResponse, MsgClaimRewardsRequest, MsgClaimRewardsResponse,
    MsgCreateRewardProgramRequest, MsgCreateRewardProgramResponse, MsgEndRewardProgramRequest,
};
use crate::context::Context;
use crate::models::event::{
    program_event, ATTRIBUTE_KEY_REWARDS_CLAIM_ADDRESS, EVENT_TYPE_CLAIM_ALL_REWARDS, EVENT_TYPE_CLAIM_REWARDS,
    EVENT_TYPE_REWARD_PROGRAM_CREATED, EVENT_TYPE_REWARD_PROGRAM_ENDED,
};
use crate::repositories::{BankKeeper, StakingKeeper};
use crate::services::RewardKeeper;
use crate::utils::Result;

/// Message handlers. Each request is validated, then executed atomically:
/// a failed request leaves no writes and no events behind.
pub struct MsgServer<B: BankKeeper, S: StakingKeeper> {
    keeper: Arc<RewardKeeper<B, S>>,
}

impl<B: BankKeeper, S: StakingKeeper> MsgServer<B, S> {
    /// Create a new message server
    pub fn new(keeper: Arc<RewardKeeper<B, S>>) -> Self {
        Self { keeper }
    }

    pub fn create_reward_program(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgCreateRewardProgramRequest,
    ) -> Result<MsgCreateRewardProgramResponse> {
        msg.validate_basic()?;
        let terms = msg.to_terms()?;

        ctx.with_cache(|ctx| {
            let id = self.keeper.create_reward_program(ctx, terms)?;
            ctx.emit_event(program_event(EVENT_TYPE_REWARD_PROGRAM_CREATED, id));
            Ok(MsgCreateRewardProgramResponse { id })
        })
    }

    pub fn end_reward_program(&self, ctx: &mut Context<'_>, msg: MsgEndRewardProgramRequest) -> Result<()> {
        msg.validate_basic()?;
        let owner = msg.owner()?;

        ctx.with_cache(|ctx| {
            self.keeper.end_reward_program(ctx, msg.reward_program_id, &owner)?;
            ctx.emit_event(program_event(EVENT_TYPE_REWARD_PROGRAM_ENDED, msg.reward_program_id));
            Ok(())
        })
    }

    pub fn claim_rewards(&self, ctx: &mut Context<'_>, msg: MsgClaimRewardsRequest) -> Result<MsgClaimRewardsResponse> {
        msg.validate_basic()?;
        let address = msg.address()?;

        ctx.with_cache(|ctx| {
            let claim_details = self.keeper.claim_rewards(ctx, msg.reward_program_id, &address)?;
            ctx.emit_event(
                program_event(EVENT_TYPE_CLAIM_REWARDS, msg.reward_program_id)
                    .with_attribute(ATTRIBUTE_KEY_REWARDS_CLAIM_ADDRESS, msg.reward_address.as_str()),
            );
            Ok(MsgClaimRewardsResponse { claim_details })
        })
    }

    pub fn claim_all_rewards(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgClaimAllRewardsRequest,
    ) -> Result<MsgClaimAllRewardsResponse> {
        msg.validate_basic()?;
        let address = msg.address()?;

        ctx.with_cache(|ctx| {
            let details = self.keeper.claim_all_rewards(ctx, &address)?;
            ctx.emit_event(
                AbciEvent::new(EVENT_TYPE_CLAIM_ALL_REWARDS)
                    .with_attribute(ATTRIBUTE_KEY_REWARDS_CLAIM_ADDRESS, msg.reward_address.as_str()),
            );
            info!(
                address = %address,
                programs = details.claim_details.len(),
                "claimed rewards from all programs"
            );
            Ok(MsgClaimAllRewardsResponse { details })
        })
    }
}
