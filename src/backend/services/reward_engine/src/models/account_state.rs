use serde::{Deserialize, Serialize};
use shared_models::AccAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Unclaimable,
    Claimable,
    Claimed,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounter {
    pub action_type: String,
    pub number_of_actions: u64,
}

/// Shares and action counts of one address in one claim period of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccountState {
    pub reward_program_id: u64,
    pub claim_period_id: u64,
    pub address: AccAddress,
    /// Kept in first-seen order.
    pub action_counter: Vec<ActionCounter>,
    pub shares_earned: u64,
    pub claim_status: ClaimStatus,
}

impl RewardAccountState {
    pub fn new(reward_program_id: u64, claim_period_id: u64, address: AccAddress) -> Self {
        Self {
            reward_program_id,
            claim_period_id,
            address,
            action_counter: Vec::new(),
            shares_earned: 0,
            claim_status: ClaimStatus::Unclaimable,
        }
    }

    pub fn action_count(&self, action_type: &str) -> u64 {
        self.action_counter
            .iter()
            .find(|counter| counter.action_type == action_type)
            .map_or(0, |counter| counter.number_of_actions)
    }

    /// Bump the counter for `action_type` and return the new count.
    pub fn increment_action_count(&mut self, action_type: &str) -> u64 {
        match self
            .action_counter
            .iter_mut()
            .find(|counter| counter.action_type == action_type)
        {
            Some(counter) => {
                counter.number_of_actions = counter.number_of_actions.saturating_add(1);
                counter.number_of_actions
            }
            None => {
                self.action_counter.push(ActionCounter {
                    action_type: action_type.to_string(),
                    number_of_actions: 1,
                });
                1
            }
        }
    }

    /// Still owed something: not yet claimed and not expired.
    pub fn is_live(&self) -> bool {
        matches!(self.claim_status, ClaimStatus::Unclaimable | ClaimStatus::Claimable)
    }
}
