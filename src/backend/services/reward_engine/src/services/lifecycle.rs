use shared_models::Coin;
use tracing::{debug, error, info};

use crate::context::Context;
use crate::models::event::{program_event, EVENT_TYPE_REWARD_PROGRAM_FINISHED, EVENT_TYPE_REWARD_PROGRAM_STARTED};
use crate::models::program::add_seconds;
use crate::models::{ClaimPeriodRewardDistribution, ProgramState, RewardProgram};
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::services::settlement::calculate_claim_period_rewards;
use crate::utils::{Result, RewardError};

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Start, roll over or finish every Pending and Started program.
    ///
    /// Each program advances in its own cached context; a failing program is
    /// logged and left as it was.
    pub fn update_unexpired_reward_programs(&self, ctx: &mut Context<'_>) -> Result<()> {
        for program in ctx.store().get_unexpired_reward_programs()? {
            let id = program.id;
            if let Err(err) = ctx.with_cache(|ctx| self.advance_reward_program(ctx, program)) {
                error!(reward_program_id = id, error = %err, "failed to advance reward program");
            }
        }
        Ok(())
    }

    fn advance_reward_program(&self, ctx: &mut Context<'_>, mut program: RewardProgram) -> Result<()> {
        let now = ctx.block_time();

        if program.is_starting(now) {
            self.start_reward_program(ctx, &mut program)?;
        } else if program.is_ending_claim_period(now) {
            self.end_reward_program_claim_period(ctx, &mut program)?;
            if program.is_ending(now) {
                self.finish_reward_program(ctx, &mut program)?;
            } else {
                self.start_reward_program_claim_period(ctx, &mut program)?;
            }
        } else {
            return Ok(());
        }

        ctx.store_mut().set_reward_program(&program)
    }

    /// Move a Pending program to Started and open its first claim period.
    pub fn start_reward_program(&self, ctx: &mut Context<'_>, program: &mut RewardProgram) -> Result<()> {
        if program.total_reward_pool.is_zero() {
            return Err(RewardError::InvalidProgramSpec(format!(
                "unable to start reward program {} with an empty reward pool",
                program.id
            )));
        }

        program.transition_to(ProgramState::Started)?;
        self.start_reward_program_claim_period(ctx, program)?;
        ctx.emit_event(program_event(EVENT_TYPE_REWARD_PROGRAM_STARTED, program.id));

        info!(reward_program_id = program.id, "reward program started");
        Ok(())
    }

    /// Open the next claim period and its distribution record.
    pub fn start_reward_program_claim_period(&self, ctx: &mut Context<'_>, program: &mut RewardProgram) -> Result<()> {
        let now = ctx.block_time();

        program.current_claim_period = program.current_claim_period.saturating_add(1);
        program.claim_period_end_time = Some(add_seconds(now, program.claim_period_seconds, 1)?);

        // Rollover periods push the expected end out
        if program.current_claim_period > program.claim_periods {
            program.expected_program_end_time =
                add_seconds(program.expected_program_end_time, program.claim_period_seconds, 1)?;
        }

        let distribution =
            ClaimPeriodRewardDistribution::new(program.current_claim_period, program.id, program.claim_period_pool());
        ctx.store_mut().set_claim_period_reward_distribution(&distribution)?;

        debug!(
            reward_program_id = program.id,
            claim_period_id = program.current_claim_period,
            rewards_pool = %distribution.rewards_pool,
            "claim period started"
        );
        Ok(())
    }

    /// Close the current claim period: fix its allocation, take it out of the
    /// remaining balance and make its claims claimable.
    pub fn end_reward_program_claim_period(&self, ctx: &mut Context<'_>, program: &mut RewardProgram) -> Result<()> {
        let claim_period_id = program.current_claim_period;
        let mut distribution = ctx
            .store()
            .get_claim_period_reward_distribution(claim_period_id, program.id)?
            .ok_or_else(|| {
                RewardError::NotFound(format!(
                    "claim period reward distribution {} of reward program {}",
                    claim_period_id, program.id
                ))
            })?;

        let states = ctx
            .store()
            .get_reward_account_states_for_claim_period(program.id, claim_period_id)?;
        let allocated = calculate_claim_period_rewards(&program.max_reward_by_address, &distribution, &states)?;

        distribution.total_rewards_pool_for_claim_period = allocated.clone();
        distribution.claim_period_ended = true;

        program.remaining_pool_balance = match program.remaining_pool_balance.checked_sub(&allocated) {
            Ok(remaining) => remaining,
            Err(err) => {
                error!(
                    reward_program_id = program.id,
                    claim_period_id,
                    error = %err,
                    "claim period allocation exceeds remaining pool balance, clamping to zero"
                );
                Coin::zero(program.remaining_pool_balance.denom.clone())
            }
        };

        ctx.store_mut().set_claim_period_reward_distribution(&distribution)?;
        ctx.store_mut()
            .make_reward_claims_claimable_for_period(program.id, claim_period_id)?;

        info!(
            reward_program_id = program.id,
            claim_period_id,
            allocated = %allocated,
            total_shares = distribution.total_shares,
            "claim period ended"
        );
        Ok(())
    }

    /// Move a program to Finished at the current block time.
    pub fn finish_reward_program(&self, ctx: &mut Context<'_>, program: &mut RewardProgram) -> Result<()> {
        program.transition_to(ProgramState::Finished)?;
        program.actual_program_end_time = Some(ctx.block_time());
        ctx.emit_event(program_event(EVENT_TYPE_REWARD_PROGRAM_FINISHED, program.id));

        info!(
            reward_program_id = program.id,
            claim_periods = program.current_claim_period,
            remaining = %program.remaining_pool_balance,
            "reward program finished"
        );
        Ok(())
    }
}
