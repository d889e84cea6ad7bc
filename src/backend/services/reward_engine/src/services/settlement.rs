use shared_models::{AccAddress, Coin};
use tracing::info;

use crate::context::Context;
use crate::models::{
    ClaimAllRewardsDetail, ClaimPeriodRewardDistribution, ClaimStatus, ClaimedRewardPeriodDetail, ProgramState,
    RewardAccountState, RewardProgramClaimDetail,
};
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::utils::math::mul_div;
use crate::utils::{Result, RewardError};

/// `min(floor(shares * pool / total_shares), max_reward)`, zero when nobody
/// earned shares.
pub fn calculate_participant_reward(shares: u64, total_shares: u64, pool: &Coin, max_reward: &Coin) -> Result<Coin> {
    if total_shares == 0 || shares == 0 {
        return Ok(Coin::zero(pool.denom.clone()));
    }

    let amount = mul_div(pool.amount, u128::from(shares), u128::from(total_shares))?;
    Ok(Coin::new(pool.denom.clone(), amount).min(max_reward)?)
}

/// Sum of the capped rewards of every participant of a claim period.
pub fn calculate_claim_period_rewards(
    max_reward: &Coin,
    distribution: &ClaimPeriodRewardDistribution,
    states: &[RewardAccountState],
) -> Result<Coin> {
    let mut sum = Coin::zero(distribution.rewards_pool.denom.clone());
    for state in states {
        let reward = calculate_participant_reward(
            state.shares_earned,
            distribution.total_shares,
            &distribution.rewards_pool,
            max_reward,
        )?;
        sum = sum.checked_add(&reward)?;
    }
    Ok(sum)
}

fn add_to_totals(totals: &mut Vec<Coin>, amount: &Coin) -> Result<()> {
    if amount.is_zero() {
        return Ok(());
    }
    match totals.iter_mut().find(|coin| coin.denom == amount.denom) {
        Some(total) => *total = total.checked_add(amount)?,
        None => totals.push(amount.clone()),
    }
    Ok(())
}

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Pay `address` everything it can claim from one finished program.
    ///
    /// Runs atomically: claims are marked first and the payout is the final
    /// step, so a failed send leaves claims and balances untouched.
    pub fn claim_rewards(
        &self,
        ctx: &mut Context<'_>,
        reward_program_id: u64,
        address: &AccAddress,
    ) -> Result<RewardProgramClaimDetail> {
        ctx.with_cache(|ctx| {
            let detail = self.settle_program_claims(ctx, reward_program_id, address)?;
            self.send_from_module(address, std::slice::from_ref(&detail.total_reward_claim))?;

            info!(
                reward_program_id,
                address = %address,
                claimed = %detail.total_reward_claim,
                claim_periods = detail.claimed_reward_period_details.len(),
                "rewards claimed"
            );
            Ok(detail)
        })
    }

    /// Claim from every finished program `address` took part in. Programs
    /// with nothing left to claim are skipped.
    ///
    /// All programs settle in one cached unit and the combined payout is a
    /// single send at the end, so either every claim is paid or none is.
    pub fn claim_all_rewards(&self, ctx: &mut Context<'_>, address: &AccAddress) -> Result<ClaimAllRewardsDetail> {
        ctx.with_cache(|ctx| {
            let mut program_ids: Vec<u64> = ctx
                .store()
                .get_reward_account_states_by_address(address)?
                .iter()
                .map(|state| state.reward_program_id)
                .collect();
            program_ids.dedup();

            let mut all = ClaimAllRewardsDetail::default();
            for reward_program_id in program_ids {
                let finished = ctx
                    .store()
                    .get_reward_program(reward_program_id)?
                    .map_or(false, |program| program.state == ProgramState::Finished);
                if !finished {
                    continue;
                }

                let detail = self.settle_program_claims(ctx, reward_program_id, address)?;
                if detail.is_empty() {
                    continue;
                }
                add_to_totals(&mut all.total_reward_claim, &detail.total_reward_claim)?;
                all.claim_details.push(detail);
            }

            self.send_from_module(address, &all.total_reward_claim)?;

            info!(
                address = %address,
                programs = all.claim_details.len(),
                "all rewards claimed"
            );
            Ok(all)
        })
    }

    /// Mark every claimable period of `address` in one program as Claimed
    /// and book the total against the program. Moves no funds.
    fn settle_program_claims(
        &self,
        ctx: &mut Context<'_>,
        reward_program_id: u64,
        address: &AccAddress,
    ) -> Result<RewardProgramClaimDetail> {
        let mut program = ctx
            .store()
            .get_reward_program(reward_program_id)?
            .ok_or(RewardError::ProgramNotFound(reward_program_id))?;

        if program.state != ProgramState::Finished {
            return Err(RewardError::InvalidState(format!(
                "reward program {} is {} and cannot be claimed",
                reward_program_id,
                program.state.as_str()
            )));
        }

        let states = ctx
            .store()
            .get_reward_account_states_by_address_and_program(address, reward_program_id)?;

        let mut details = Vec::new();
        let mut total = Coin::zero(program.total_reward_pool.denom.clone());
        for mut state in states {
            if state.claim_status != ClaimStatus::Claimable {
                continue;
            }

            let distribution = ctx
                .store()
                .get_claim_period_reward_distribution(state.claim_period_id, reward_program_id)?
                .ok_or_else(|| {
                    RewardError::NotFound(format!(
                        "claim period reward distribution {} of reward program {}",
                        state.claim_period_id, reward_program_id
                    ))
                })?;
            let reward = calculate_participant_reward(
                state.shares_earned,
                distribution.total_shares,
                &distribution.rewards_pool,
                &program.max_reward_by_address,
            )?;

            state.claim_status = ClaimStatus::Claimed;
            ctx.store_mut().set_reward_account_state(&state)?;

            total = total.checked_add(&reward)?;
            details.push(ClaimedRewardPeriodDetail {
                claim_period_id: state.claim_period_id,
                total_shares: state.shares_earned,
                claim_period_reward: reward,
            });
        }

        if total.is_positive() {
            program.claimed_amount = program.claimed_amount.checked_add(&total)?;
            ctx.store_mut().set_reward_program(&program)?;
        }

        Ok(RewardProgramClaimDetail {
            reward_program_id,
            total_reward_claim: total,
            claimed_reward_period_details: details,
        })
    }
}
