use shared_models::AbciEvent;
use tracing::{debug, error, warn};

use crate::context::Context;
use crate::models::{EvaluationResult, ProgramState, QualifyingAction, RewardProgram};
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::utils::Result;

/// Assemble every complete action of `action`'s type from the event log, in
/// log order. Malformed events are logged and skipped.
pub fn find_qualifying_actions(events: &[AbciEvent], action: &QualifyingAction) -> Vec<EvaluationResult> {
    let mut builder = action.builder();
    let criteria = builder.event_criteria();
    let mut results = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if !criteria.matches(event) {
            continue;
        }

        if let Err(err) = builder.add_event(event) {
            warn!(
                action_type = builder.action_type(),
                event_index = index,
                event_type = %event.event_type,
                error = %err,
                "skipping malformed event"
            );
            continue;
        }

        if builder.can_build() {
            match builder.build_action() {
                Ok(result) => results.push(result),
                Err(err) => warn!(action_type = builder.action_type(), error = %err, "unable to build action"),
            }
            builder.reset();
        }
    }

    results
}

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    /// Detect and score this block's qualifying actions for every Started
    /// program, in program id order.
    pub fn process_transactions(&self, ctx: &mut Context<'_>) -> Result<()> {
        for program in ctx.store().get_reward_programs_in_state(ProgramState::Started)? {
            let id = program.id;
            if let Err(err) = ctx.with_cache(|ctx| self.process_reward_program(ctx, &program)) {
                error!(reward_program_id = id, error = %err, "failed to process qualifying actions");
            }
        }
        Ok(())
    }

    fn process_reward_program(&self, ctx: &mut Context<'_>, program: &RewardProgram) -> Result<()> {
        let events = ctx.event_history();
        for action in &program.qualifying_actions {
            let results = find_qualifying_actions(events, action);
            debug!(
                reward_program_id = program.id,
                action_type = action.action_type(),
                found = results.len(),
                "qualifying actions detected"
            );
            if results.is_empty() {
                continue;
            }
            self.reward_shares(ctx, program, action, &results)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionTransfer;
    use shared_models::{AccAddress, Coin};

    const ACCOUNT: &str = "cosmos1v57fx2l2rt6ehujuu99u2fw05779m5e2ux4z2h";

    fn transfer_action() -> QualifyingAction {
        QualifyingAction::Transfer(ActionTransfer {
            minimum_actions: 0,
            maximum_actions: 0,
            minimum_delegation_amount: Coin::new("nhash", 0),
        })
    }

    fn transfer(recipient: &str) -> AbciEvent {
        AbciEvent::new("transfer")
            .with_attribute("recipient", recipient)
            .with_attribute("sender", ACCOUNT)
            .with_attribute("amount", "100nhash")
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let events = vec![
            AbciEvent::new("coin_spent").with_attribute("spender", ACCOUNT),
            transfer(ACCOUNT),
            AbciEvent::new("message").with_attribute("module", "staking"),
            AbciEvent::new("message").with_attribute("module", "bank").with_attribute("sender", ACCOUNT),
        ];

        let results = find_qualifying_actions(&events, &transfer_action());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].address, AccAddress::from_bech32(ACCOUNT).unwrap());
    }

    #[test]
    fn test_malformed_transfer_is_skipped() {
        let events = vec![
            transfer("garbage"),
            AbciEvent::new("message").with_attribute("module", "bank"),
            transfer(ACCOUNT),
            AbciEvent::new("message").with_attribute("module", "bank"),
        ];

        // the bank message pairs with the next well-formed transfer
        let results = find_qualifying_actions(&events, &transfer_action());
        assert_eq!(results.len(), 1);
    }
}
