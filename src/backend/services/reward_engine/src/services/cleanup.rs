use shared_models::Coin;
use tracing::{error, info};

use crate::context::Context;
use crate::models::event::{program_event, EVENT_TYPE_REWARD_PROGRAM_EXPIRED};
use crate::models::{ProgramState, RewardAccountState, RewardProgram};
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::services::settlement::calculate_participant_reward;
use crate::utils::Result;

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Remove dead programs, then expire finished programs whose claim window
    /// has closed.
    pub fn cleanup(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.remove_dead_programs(ctx)?;
        self.expire_reward_programs(ctx)
    }

    /// Refund and delete Expired programs and Finished programs nobody is
    /// owed anything by.
    pub fn remove_dead_programs(&self, ctx: &mut Context<'_>) -> Result<()> {
        for program in ctx.store().get_all_reward_programs()? {
            let dead = match program.state {
                ProgramState::Expired => true,
                ProgramState::Finished => !ctx
                    .store()
                    .get_reward_account_states_for_program(program.id)?
                    .iter()
                    .any(RewardAccountState::is_live),
                ProgramState::Pending | ProgramState::Started => false,
            };
            if !dead {
                continue;
            }

            let id = program.id;
            if let Err(err) = ctx.with_cache(|ctx| self.remove_reward_program(ctx, program)) {
                error!(reward_program_id = id, error = %err, "failed to remove reward program");
            }
        }
        Ok(())
    }

    fn remove_reward_program(&self, ctx: &mut Context<'_>, mut program: RewardProgram) -> Result<()> {
        let refunded = self.take_remaining_balance(ctx, &mut program)?;
        ctx.store_mut().remove_reward_program_records(program.id)?;
        self.send_from_module(&program.distribute_from_address, std::slice::from_ref(&refunded))?;

        info!(
            reward_program_id = program.id,
            refunded = %refunded,
            "reward program removed"
        );
        Ok(())
    }

    /// Expire every Finished program past its expiration time.
    pub fn expire_reward_programs(&self, ctx: &mut Context<'_>) -> Result<()> {
        let now = ctx.block_time();
        for program in ctx.store().get_reward_programs_in_state(ProgramState::Finished)? {
            if !program.is_expiring(now) {
                continue;
            }

            let id = program.id;
            if let Err(err) = ctx.with_cache(|ctx| self.expire_reward_program(ctx, program)) {
                error!(reward_program_id = id, error = %err, "failed to expire reward program");
            }
        }
        Ok(())
    }

    /// Expire unclaimed rewards and return them, with the rest of the pool,
    /// to the funder in a single send made after every store write.
    pub fn expire_reward_program(&self, ctx: &mut Context<'_>, mut program: RewardProgram) -> Result<()> {
        program.transition_to(ProgramState::Expired)?;

        let expired = ctx.store_mut().expire_reward_claims_for_program(program.id)?;
        let claims_refunded = self.refund_reward_claims(ctx, &program, &expired)?;
        let balance_refunded = self.take_remaining_balance(ctx, &mut program)?;
        let refund = claims_refunded.checked_add(&balance_refunded)?;

        ctx.emit_event(program_event(EVENT_TYPE_REWARD_PROGRAM_EXPIRED, program.id));
        self.send_from_module(&program.distribute_from_address, &[refund])?;
        info!(
            reward_program_id = program.id,
            expired_claims = expired.len(),
            claims_refunded = %claims_refunded,
            balance_refunded = %balance_refunded,
            "reward program expired"
        );
        Ok(())
    }

    /// Total allocation of `expired` claims, owed back to the funder.
    pub fn refund_reward_claims(
        &self,
        ctx: &mut Context<'_>,
        program: &RewardProgram,
        expired: &[RewardAccountState],
    ) -> Result<Coin> {
        let mut refund = Coin::zero(program.total_reward_pool.denom.clone());
        for state in expired {
            let Some(distribution) = ctx
                .store()
                .get_claim_period_reward_distribution(state.claim_period_id, program.id)?
            else {
                continue;
            };
            if !distribution.claim_period_ended {
                continue;
            }

            let reward = calculate_participant_reward(
                state.shares_earned,
                distribution.total_shares,
                &distribution.rewards_pool,
                &program.max_reward_by_address,
            )?;
            refund = refund.checked_add(&reward)?;
        }
        Ok(refund)
    }

    /// Zero the remaining pool balance and persist it with the program,
    /// returning what the funder is owed.
    pub fn take_remaining_balance(&self, ctx: &mut Context<'_>, program: &mut RewardProgram) -> Result<Coin> {
        let denom = program.remaining_pool_balance.denom.clone();
        let refund = std::mem::replace(&mut program.remaining_pool_balance, Coin::zero(denom));
        ctx.store_mut().set_reward_program(program)?;
        Ok(refund)
    }
}
