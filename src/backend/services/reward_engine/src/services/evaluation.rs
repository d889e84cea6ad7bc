use shared_models::{AccAddress, Dec};
use tracing::debug;

use crate::context::Context;
use crate::models::action::within_action_window;
use crate::models::{
    ActionDelegate, EvaluationResult, ProposalStatus, QualifyingAction, RewardAccountState, RewardProgram, Validator,
};
use crate::repositories::{BankKeeper, KvStore, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::utils::{Result, RewardError};

/// Tokens `delegator` has bonded across all validators.
pub fn total_delegated_tokens<K: StakingKeeper + ?Sized>(staking: &K, delegator: &AccAddress) -> u128 {
    staking
        .get_all_delegator_delegations(delegator)
        .iter()
        .filter_map(|delegation| {
            staking
                .get_validator(&delegation.validator_address)
                .map(|validator| validator.tokens_from_shares(delegation.shares))
        })
        .fold(0u128, u128::saturating_add)
}

/// Share of bonded validators with strictly less power than `validator`.
/// Validators outside the bonded set rank at zero.
pub fn active_stake_percentile<K: StakingKeeper + ?Sized>(staking: &K, validator: &Validator) -> Result<Dec> {
    let bonded = staking.get_bonded_validators_by_power();
    if bonded.is_empty()
        || !bonded
            .iter()
            .any(|candidate| candidate.operator_address == validator.operator_address)
    {
        return Ok(Dec::zero());
    }

    let weaker = bonded.iter().filter(|candidate| candidate.tokens < validator.tokens).count();
    Ok(Dec::from_ratio(weaker as u128, bonded.len() as u128)?)
}

fn evaluate_delegate<K: StakingKeeper + ?Sized>(
    action: &ActionDelegate,
    staking: &K,
    result: &EvaluationResult,
) -> Result<bool> {
    let (Some(delegator), Some(validator_address)) = (&result.delegator, &result.validator) else {
        return Ok(false);
    };
    let Some(validator) = staking.get_validator(validator_address) else {
        return Ok(false);
    };
    let Some(delegation) = staking.get_delegation(delegator, validator_address) else {
        return Ok(false);
    };

    let tokens = validator.tokens_from_shares(delegation.shares);
    if tokens < action.minimum_delegation_amount.amount || tokens > action.maximum_delegation_amount.amount {
        return Ok(false);
    }

    let percentile = active_stake_percentile(staking, &validator)?;
    Ok(percentile >= action.minimum_active_stake_percentile && percentile <= action.maximum_active_stake_percentile)
}

impl QualifyingAction {
    /// Whether the account may still earn from this action in the period.
    pub fn pre_evaluate(&self, state: &RewardAccountState) -> bool {
        let (_, maximum_actions) = self.action_window();
        maximum_actions == 0 || state.action_count(self.action_type()) < maximum_actions
    }

    /// Check the action's thresholds against current staking and governance state.
    pub fn evaluate<T: KvStore + ?Sized, K: StakingKeeper + ?Sized>(
        &self,
        store: &T,
        staking: &K,
        result: &EvaluationResult,
    ) -> Result<bool> {
        match self {
            QualifyingAction::Delegate(action) => evaluate_delegate(action, staking, result),
            QualifyingAction::Vote(action) => {
                if let Some(proposal_id) = result.proposal_id {
                    if store.get_proposal_status(proposal_id)? == Some(ProposalStatus::VotingEnded) {
                        return Ok(false);
                    }
                }
                Ok(total_delegated_tokens(staking, &result.address) >= action.minimum_delegation_amount.amount)
            }
            QualifyingAction::Transfer(action) => {
                Ok(total_delegated_tokens(staking, &result.address) >= action.minimum_delegation_amount.amount)
            }
        }
    }

    /// Whether the updated action count falls inside the rewarded window.
    pub fn post_evaluate(&self, action_count: u64) -> bool {
        let (minimum_actions, maximum_actions) = self.action_window();
        within_action_window(action_count, minimum_actions, maximum_actions)
    }
}

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Run each result through the action's evaluation stages and grant
    /// shares to the ones that pass, in the program's current claim period.
    pub fn reward_shares(
        &self,
        ctx: &mut Context<'_>,
        program: &RewardProgram,
        action: &QualifyingAction,
        results: &[EvaluationResult],
    ) -> Result<()> {
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

        for result in results {
            let mut state = ctx
                .store()
                .get_reward_account_state(program.id, claim_period_id, &result.address)?
                .unwrap_or_else(|| RewardAccountState::new(program.id, claim_period_id, result.address.clone()));

            if self.evaluate_result(ctx, action, &mut state, result)? {
                state.shares_earned = state.shares_earned.saturating_add(result.shares);
                distribution.total_shares = distribution.total_shares.saturating_add(result.shares);
                debug!(
                    reward_program_id = program.id,
                    claim_period_id,
                    address = %result.address,
                    action_type = action.action_type(),
                    shares_earned = state.shares_earned,
                    "shares granted"
                );
            }

            ctx.store_mut().set_reward_account_state(&state)?;
        }

        ctx.store_mut().set_claim_period_reward_distribution(&distribution)
    }

    fn evaluate_result(
        &self,
        ctx: &Context<'_>,
        action: &QualifyingAction,
        state: &mut RewardAccountState,
        result: &EvaluationResult,
    ) -> Result<bool> {
        if !action.pre_evaluate(state) {
            return Ok(false);
        }
        if !action.evaluate(ctx.store(), self.staking(), result)? {
            return Ok(false);
        }
        let action_count = state.increment_action_count(action.action_type());
        Ok(action.post_evaluate(action_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionTransfer, BondStatus, Delegation, ACTION_TYPE_TRANSFER};
    use crate::repositories::MemoryStore;
    use mockall::mock;
    use shared_models::{Coin, ValAddress};

    mock! {
        pub Staking {}

        impl StakingKeeper for Staking {
            fn get_validator(&self, address: &ValAddress) -> Option<Validator>;
            fn get_delegation(&self, delegator: &AccAddress, validator: &ValAddress) -> Option<Delegation>;
            fn get_all_delegator_delegations(&self, delegator: &AccAddress) -> Vec<Delegation>;
            fn get_bonded_validators_by_power(&self) -> Vec<Validator>;
        }
    }

    fn validator(byte: u8, tokens: u128) -> Validator {
        Validator {
            operator_address: ValAddress::new(vec![byte; 20]).unwrap(),
            status: BondStatus::Bonded,
            jailed: false,
            tokens,
            delegator_shares: tokens,
        }
    }

    #[test]
    fn test_active_stake_percentile() {
        // Setup mock staking keeper
        let mut staking = MockStaking::new();
        staking
            .expect_get_bonded_validators_by_power()
            .returning(|| vec![validator(4, 400), validator(3, 300), validator(2, 200), validator(1, 100)]);

        let percentile = active_stake_percentile(&staking, &validator(3, 300)).unwrap();
        assert_eq!(percentile, "0.5".parse().unwrap());

        let lowest = active_stake_percentile(&staking, &validator(1, 100)).unwrap();
        assert!(lowest.is_zero());

        let outsider = active_stake_percentile(&staking, &validator(9, 1_000)).unwrap();
        assert!(outsider.is_zero());
    }

    #[test]
    fn test_transfer_requires_minimum_delegation() {
        let address = AccAddress::new(vec![7u8; 20]).unwrap();
        let delegation = Delegation {
            delegator_address: address.clone(),
            validator_address: ValAddress::new(vec![1u8; 20]).unwrap(),
            shares: 50,
        };

        // Setup mock staking keeper
        let mut staking = MockStaking::new();
        staking
            .expect_get_all_delegator_delegations()
            .times(2)
            .returning(move |_| vec![delegation.clone()]);
        staking
            .expect_get_validator()
            .returning(|_| Some(validator(1, 100)));

        let store = MemoryStore::new();
        let result = EvaluationResult::new(address);
        let action = |minimum| {
            QualifyingAction::Transfer(ActionTransfer {
                minimum_actions: 0,
                maximum_actions: 0,
                minimum_delegation_amount: Coin::new("nhash", minimum),
            })
        };

        assert!(action(50).evaluate(&store, &staking, &result).unwrap());
        assert!(!action(51).evaluate(&store, &staking, &result).unwrap());
    }

    #[test]
    fn test_pre_and_post_evaluate_windows() {
        let action = QualifyingAction::Transfer(ActionTransfer {
            minimum_actions: 2,
            maximum_actions: 3,
            minimum_delegation_amount: Coin::new("nhash", 0),
        });
        let mut state = RewardAccountState::new(1, 1, AccAddress::new(vec![7u8; 20]).unwrap());

        assert!(action.pre_evaluate(&state));
        assert!(!action.post_evaluate(state.increment_action_count(ACTION_TYPE_TRANSFER)));
        assert!(action.post_evaluate(state.increment_action_count(ACTION_TYPE_TRANSFER)));
        assert!(action.post_evaluate(state.increment_action_count(ACTION_TYPE_TRANSFER)));
        assert!(!action.pre_evaluate(&state));
    }
}
