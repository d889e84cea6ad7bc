use std::sync::Arc;

use shared_models::{AccAddress, Coin};
use tracing::info;

use crate::config::RewardConfig;
use crate::context::Context;
use crate::models::{ProgramState, ProgramTerms, RewardProgram};
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::utils::math::percent_of;
use crate::utils::{Result, RewardError};

/// Reward program engine over the host chain's bank and staking modules
pub struct RewardKeeper<B: BankKeeper, S: StakingKeeper> {
    bank: Arc<B>,
    staking: Arc<S>,
    config: RewardConfig,
}

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Create a new reward keeper
    pub fn new(bank: Arc<B>, staking: Arc<S>, config: RewardConfig) -> Self {
        Self { bank, staking, config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub(crate) fn staking(&self) -> &S {
        self.staking.as_ref()
    }

    /// Advance every Pending and Started program against the block time.
    pub fn begin_blocker(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.update_unexpired_reward_programs(ctx)
    }

    /// Score the block's qualifying actions, then clean up unless cleanup is
    /// tied to an epoch.
    pub fn end_blocker(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.process_transactions(ctx)?;
        if self.config.cleanup_epoch_identifier.is_none() {
            self.cleanup(ctx)?;
        }
        Ok(())
    }

    /// Escrow the pool of a new program and persist it as Pending.
    ///
    /// The escrow is the last step, so a failed transfer leaves no program
    /// behind.
    pub fn create_reward_program(&self, ctx: &mut Context<'_>, terms: ProgramTerms) -> Result<u64> {
        ctx.with_cache(|ctx| self.escrow_reward_program(ctx, terms))
    }

    fn escrow_reward_program(&self, ctx: &mut Context<'_>, terms: ProgramTerms) -> Result<u64> {
        let id = ctx.store().get_reward_program_id()?;
        let mut program = RewardProgram::new(id, terms)?;
        program.validate_basic()?;

        // Verify the program does not start in the past
        if program.program_start_time < ctx.block_time() {
            return Err(RewardError::InvalidProgramSpec(format!(
                "start time is before current block time {} : {}",
                program.program_start_time,
                ctx.block_time()
            )));
        }

        // Verify the funder can cover the pool
        let pool = program.total_reward_pool.clone();
        let spendable = self
            .bank
            .spendable_coins(&program.distribute_from_address)
            .into_iter()
            .find(|coin| coin.denom == pool.denom)
            .unwrap_or_else(|| Coin::zero(pool.denom.clone()));
        if spendable.amount < pool.amount {
            return Err(RewardError::InsufficientFunds(format!(
                "unable to send coin {} from {} : spendable balance {}",
                pool, program.distribute_from_address, spendable
            )));
        }

        program.minimum_rollover_amount = Coin::new(
            pool.denom.clone(),
            percent_of(pool.amount, self.config.minimum_rollover_percent)?,
        );

        let next_id = id
            .checked_add(1)
            .ok_or_else(|| RewardError::InvalidState("reward program id sequence exhausted".to_string()))?;
        ctx.store_mut().set_reward_program(&program)?;
        ctx.store_mut().set_reward_program_id(next_id);

        self.bank
            .send_coins_from_account_to_module(&program.distribute_from_address, &self.config.module_account, &pool)
            .map_err(bank_error)?;

        info!(
            reward_program_id = id,
            funder = %program.distribute_from_address,
            pool = %pool,
            "reward program created"
        );
        Ok(id)
    }

    /// End a program ahead of schedule at the funder's request.
    ///
    /// A Started program closes its current claim period now; a Pending one
    /// finishes without starting and is refunded by the next cleanup.
    pub fn end_reward_program(&self, ctx: &mut Context<'_>, id: u64, requester: &AccAddress) -> Result<()> {
        let mut program = ctx
            .store()
            .get_reward_program(id)?
            .ok_or(RewardError::ProgramNotFound(id))?;

        if matches!(program.state, ProgramState::Finished | ProgramState::Expired) {
            return Err(RewardError::InvalidState(format!(
                "unable to end reward program {} in state {}",
                id,
                program.state.as_str()
            )));
        }
        if &program.distribute_from_address != requester {
            return Err(RewardError::NotAuthorized(format!(
                "{requester} is not the distribute from address of reward program {id}"
            )));
        }

        if program.state == ProgramState::Started {
            let now = ctx.block_time();
            program.claim_periods = program.current_claim_period;
            program.max_rollover_claim_periods = 0;
            program.claim_period_end_time = Some(now);
            program.expected_program_end_time = now;
            self.end_reward_program_claim_period(ctx, &mut program)?;
        }

        self.finish_reward_program(ctx, &mut program)?;
        ctx.store_mut().set_reward_program(&program)?;

        info!(reward_program_id = id, "reward program ended by funder");
        Ok(())
    }

    /// Pay `amounts` out of the module account in one bank send. Zero
    /// amounts are dropped and nothing is sent when none remain.
    pub(crate) fn send_from_module(&self, recipient: &AccAddress, amounts: &[Coin]) -> Result<()> {
        let amounts: Vec<Coin> = amounts.iter().filter(|coin| coin.is_positive()).cloned().collect();
        if amounts.is_empty() {
            return Ok(());
        }
        self.bank
            .send_coins_from_module_to_account(&self.config.module_account, recipient, &amounts)
            .map_err(bank_error)
    }
}

fn bank_error(err: anyhow::Error) -> RewardError {
    RewardError::Bank(format!("{err:#}"))
}
