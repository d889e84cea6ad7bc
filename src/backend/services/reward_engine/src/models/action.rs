use serde::{Deserialize, Serialize};
use shared_models::{AccAddress, Coin, Dec, ValAddress};

use crate::utils::{Result, RewardError};

pub const ACTION_TYPE_DELEGATE: &str = "ActionDelegate";
pub const ACTION_TYPE_VOTE: &str = "ActionVote";
pub const ACTION_TYPE_TRANSFER: &str = "ActionTransfer";

/// Delegating stake to a validator within an amount and validator rank window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDelegate {
    pub minimum_actions: u64,
    /// Zero means no upper bound.
    pub maximum_actions: u64,
    pub minimum_delegation_amount: Coin,
    pub maximum_delegation_amount: Coin,
    pub minimum_active_stake_percentile: Dec,
    pub maximum_active_stake_percentile: Dec,
}

/// Voting on a governance proposal while holding a minimum delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionVote {
    pub minimum_actions: u64,
    pub maximum_actions: u64,
    pub minimum_delegation_amount: Coin,
}

/// Sending funds while holding a minimum delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTransfer {
    pub minimum_actions: u64,
    pub maximum_actions: u64,
    pub minimum_delegation_amount: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QualifyingAction {
    Delegate(ActionDelegate),
    Vote(ActionVote),
    Transfer(ActionTransfer),
}

/// One assembled occurrence of a qualifying action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub address: AccAddress,
    pub shares: u64,
    pub validator: Option<ValAddress>,
    pub delegator: Option<AccAddress>,
    pub recipient: Option<AccAddress>,
    pub proposal_id: Option<u64>,
}

impl EvaluationResult {
    pub fn new(address: AccAddress) -> Self {
        Self {
            address,
            shares: 1,
            validator: None,
            delegator: None,
            recipient: None,
            proposal_id: None,
        }
    }
}

fn validate_action_window(minimum_actions: u64, maximum_actions: u64) -> Result<()> {
    if maximum_actions != 0 && minimum_actions > maximum_actions {
        return Err(RewardError::InvalidProgramSpec(format!(
            "minimum actions ({minimum_actions}) cannot be larger than maximum actions ({maximum_actions})"
        )));
    }
    Ok(())
}

fn validate_minimum_delegation(coin: &Coin) -> Result<()> {
    coin.validate().map_err(|err| {
        RewardError::InvalidProgramSpec(format!("invalid minimum delegation amount {coin}: {err}"))
    })
}

/// `count` lies in `[minimum, maximum]`, with a zero maximum meaning unbounded.
pub fn within_action_window(count: u64, minimum: u64, maximum: u64) -> bool {
    count >= minimum && (maximum == 0 || count <= maximum)
}

impl ActionDelegate {
    pub fn validate_basic(&self) -> Result<()> {
        validate_action_window(self.minimum_actions, self.maximum_actions)?;
        validate_minimum_delegation(&self.minimum_delegation_amount)?;

        if self.minimum_delegation_amount.denom != self.maximum_delegation_amount.denom {
            return Err(RewardError::InvalidProgramSpec(format!(
                "coin denoms differ {} : {}",
                self.minimum_delegation_amount.denom, self.maximum_delegation_amount.denom
            )));
        }
        if self.minimum_delegation_amount.amount > self.maximum_delegation_amount.amount {
            return Err(RewardError::InvalidProgramSpec(format!(
                "minimum delegation amount ({}) cannot be larger than maximum delegation amount ({})",
                self.minimum_delegation_amount, self.maximum_delegation_amount
            )));
        }
        if self.maximum_active_stake_percentile > Dec::one()
            || self.minimum_active_stake_percentile > self.maximum_active_stake_percentile
        {
            return Err(RewardError::InvalidProgramSpec(format!(
                "active stake percentiles must satisfy 0 <= {} <= {} <= 1",
                self.minimum_active_stake_percentile, self.maximum_active_stake_percentile
            )));
        }
        Ok(())
    }
}

impl QualifyingAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            QualifyingAction::Delegate(_) => ACTION_TYPE_DELEGATE,
            QualifyingAction::Vote(_) => ACTION_TYPE_VOTE,
            QualifyingAction::Transfer(_) => ACTION_TYPE_TRANSFER,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        match self {
            QualifyingAction::Delegate(delegate) => delegate.validate_basic(),
            QualifyingAction::Vote(vote) => {
                validate_action_window(vote.minimum_actions, vote.maximum_actions)?;
                validate_minimum_delegation(&vote.minimum_delegation_amount)
            }
            QualifyingAction::Transfer(transfer) => {
                validate_action_window(transfer.minimum_actions, transfer.maximum_actions)?;
                validate_minimum_delegation(&transfer.minimum_delegation_amount)
            }
        }
    }

    /// Inclusive action-count window for this action.
    pub fn action_window(&self) -> (u64, u64) {
        match self {
            QualifyingAction::Delegate(a) => (a.minimum_actions, a.maximum_actions),
            QualifyingAction::Vote(a) => (a.minimum_actions, a.maximum_actions),
            QualifyingAction::Transfer(a) => (a.minimum_actions, a.maximum_actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegate() -> ActionDelegate {
        ActionDelegate {
            minimum_actions: 0,
            maximum_actions: 0,
            minimum_delegation_amount: Coin::new("nhash", 0),
            maximum_delegation_amount: Coin::new("nhash", 100),
            minimum_active_stake_percentile: Dec::zero(),
            maximum_active_stake_percentile: Dec::one(),
        }
    }

    #[test]
    fn test_delegate_validation() {
        assert!(delegate().validate_basic().is_ok());

        let mut action = delegate();
        action.maximum_delegation_amount = Coin::new("hotdog", 100);
        assert!(action.validate_basic().is_err());

        let mut action = delegate();
        action.minimum_active_stake_percentile = "0.8".parse().unwrap();
        action.maximum_active_stake_percentile = "0.2".parse().unwrap();
        assert!(action.validate_basic().is_err());

        let mut action = delegate();
        action.minimum_actions = 3;
        action.maximum_actions = 2;
        assert!(action.validate_basic().is_err());
    }

    #[test]
    fn test_action_window() {
        assert!(within_action_window(1, 0, 0));
        assert!(within_action_window(5, 1, 5));
        assert!(!within_action_window(6, 1, 5));
        assert!(!within_action_window(0, 1, 5));
    }

    #[test]
    fn test_serde_round_trip() {
        let actions = vec![
            QualifyingAction::Delegate(ActionDelegate {
                maximum_delegation_amount: Coin::new("nhash", u128::MAX),
                minimum_active_stake_percentile: "0.25".parse().unwrap(),
                ..delegate()
            }),
            QualifyingAction::Vote(ActionVote {
                minimum_actions: 0,
                maximum_actions: 1,
                minimum_delegation_amount: Coin::new("nhash", 10),
            }),
            QualifyingAction::Transfer(ActionTransfer {
                minimum_actions: 2,
                maximum_actions: 0,
                minimum_delegation_amount: Coin::new("nhash", 1_000_000_000_000_000_000_000),
            }),
        ];

        for action in actions {
            let json = serde_json::to_vec(&action).unwrap();
            let decoded: QualifyingAction = serde_json::from_slice(&json).unwrap();
            assert_eq!(decoded, action);
        }

        let vote = serde_json::to_value(QualifyingAction::Vote(ActionVote {
            minimum_actions: 0,
            maximum_actions: 0,
            minimum_delegation_amount: Coin::new("nhash", 0),
        }))
        .unwrap();
        assert_eq!(vote["type"], "vote");
    }
}
