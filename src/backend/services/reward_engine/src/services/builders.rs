//! Assemblers that turn a run of ABCI events into one qualifying action.
//!
//! A logical action is spread over several events (a bank `message` event
//! plus the `transfer` it caused, a staking `message` plus the `delegate`).
//! Each builder accumulates the pieces it cares about until it can produce an
//! [`EvaluationResult`], then is reset for the next action in the log.

use shared_models::{AbciEvent, AccAddress, ValAddress};

use crate::models::action::{ACTION_TYPE_DELEGATE, ACTION_TYPE_TRANSFER, ACTION_TYPE_VOTE};
use crate::models::{EvaluationResult, EventCriteria, ExpectedEvent, QualifyingAction};
use crate::utils::{Result, RewardError};

pub const EVENT_TYPE_MESSAGE: &str = "message";
pub const EVENT_TYPE_DELEGATE: &str = "delegate";
pub const EVENT_TYPE_CREATE_VALIDATOR: &str = "create_validator";
pub const EVENT_TYPE_PROPOSAL_VOTE: &str = "proposal_vote";
pub const EVENT_TYPE_TRANSFER: &str = "transfer";

pub const ATTRIBUTE_KEY_MODULE: &str = "module";
pub const ATTRIBUTE_KEY_SENDER: &str = "sender";
pub const ATTRIBUTE_KEY_RECIPIENT: &str = "recipient";
pub const ATTRIBUTE_KEY_VALIDATOR: &str = "validator";
pub const ATTRIBUTE_KEY_PROPOSAL_ID: &str = "proposal_id";

pub const MODULE_STAKING: &str = "staking";
pub const MODULE_GOV: &str = "gov";
pub const MODULE_BANK: &str = "bank";

fn attribute_str<'e>(event: &'e AbciEvent, key: &str) -> Result<&'e str> {
    let raw = event.attribute(key).ok_or_else(|| {
        RewardError::MalformedEvent(format!("{} event is missing attribute {}", event.event_type, key))
    })?;
    std::str::from_utf8(raw).map_err(|_| {
        RewardError::MalformedEvent(format!("{} event attribute {} is not utf-8", event.event_type, key))
    })
}

fn account_attribute(event: &AbciEvent, key: &str) -> Result<AccAddress> {
    Ok(AccAddress::from_bech32(attribute_str(event, key)?)?)
}

fn validator_attribute(event: &AbciEvent, key: &str) -> Result<ValAddress> {
    Ok(ValAddress::from_bech32(attribute_str(event, key)?)?)
}

fn is_module_message(event: &AbciEvent, module: &str) -> bool {
    event.event_type == EVENT_TYPE_MESSAGE && event.attribute(ATTRIBUTE_KEY_MODULE) == Some(module.as_bytes())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegateActionBuilder {
    delegator: Option<AccAddress>,
    validator: Option<ValAddress>,
}

impl DelegateActionBuilder {
    fn add_event(&mut self, event: &AbciEvent) -> Result<()> {
        if is_module_message(event, MODULE_STAKING) {
            self.delegator = Some(account_attribute(event, ATTRIBUTE_KEY_SENDER)?);
        } else if event.event_type == EVENT_TYPE_DELEGATE || event.event_type == EVENT_TYPE_CREATE_VALIDATOR {
            self.validator = Some(validator_attribute(event, ATTRIBUTE_KEY_VALIDATOR)?);
        }
        Ok(())
    }

    fn build_action(&self) -> Result<EvaluationResult> {
        match (&self.delegator, &self.validator) {
            (Some(delegator), Some(validator)) => {
                let mut result = EvaluationResult::new(delegator.clone());
                result.delegator = Some(delegator.clone());
                result.validator = Some(validator.clone());
                Ok(result)
            }
            _ => Err(incomplete(ACTION_TYPE_DELEGATE)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteActionBuilder {
    voter: Option<AccAddress>,
    proposal_id: Option<u64>,
}

impl VoteActionBuilder {
    fn add_event(&mut self, event: &AbciEvent) -> Result<()> {
        if is_module_message(event, MODULE_GOV) {
            self.voter = Some(account_attribute(event, ATTRIBUTE_KEY_SENDER)?);
        } else if event.event_type == EVENT_TYPE_PROPOSAL_VOTE {
            let raw = attribute_str(event, ATTRIBUTE_KEY_PROPOSAL_ID)?;
            let proposal_id = raw.parse::<u64>().map_err(|err| {
                RewardError::MalformedEvent(format!("invalid proposal id {raw:?}: {err}"))
            })?;
            self.proposal_id = Some(proposal_id);
        }
        Ok(())
    }

    fn build_action(&self) -> Result<EvaluationResult> {
        match (&self.voter, self.proposal_id) {
            (Some(voter), Some(proposal_id)) => {
                let mut result = EvaluationResult::new(voter.clone());
                result.proposal_id = Some(proposal_id);
                Ok(result)
            }
            _ => Err(incomplete(ACTION_TYPE_VOTE)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferActionBuilder {
    sender: Option<AccAddress>,
    recipient: Option<AccAddress>,
    bank_message_seen: bool,
}

impl TransferActionBuilder {
    fn add_event(&mut self, event: &AbciEvent) -> Result<()> {
        if event.event_type == EVENT_TYPE_TRANSFER {
            let sender = account_attribute(event, ATTRIBUTE_KEY_SENDER)?;
            let recipient = account_attribute(event, ATTRIBUTE_KEY_RECIPIENT)?;
            self.sender = Some(sender);
            self.recipient = Some(recipient);
        } else if is_module_message(event, MODULE_BANK) {
            self.bank_message_seen = true;
        }
        Ok(())
    }

    fn build_action(&self) -> Result<EvaluationResult> {
        match (&self.sender, &self.recipient, self.bank_message_seen) {
            (Some(sender), Some(recipient), true) => {
                let mut result = EvaluationResult::new(sender.clone());
                result.recipient = Some(recipient.clone());
                Ok(result)
            }
            _ => Err(incomplete(ACTION_TYPE_TRANSFER)),
        }
    }
}

fn incomplete(action_type: &str) -> RewardError {
    RewardError::InvalidState(format!("{action_type} builder cannot build an incomplete action"))
}

/// Per-action-type assembler, one instance per program per block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionBuilder {
    Delegate(DelegateActionBuilder),
    Vote(VoteActionBuilder),
    Transfer(TransferActionBuilder),
}

impl ActionBuilder {
    pub fn action_type(&self) -> &'static str {
        match self {
            ActionBuilder::Delegate(_) => ACTION_TYPE_DELEGATE,
            ActionBuilder::Vote(_) => ACTION_TYPE_VOTE,
            ActionBuilder::Transfer(_) => ACTION_TYPE_TRANSFER,
        }
    }

    /// Events this builder consumes.
    pub fn event_criteria(&self) -> EventCriteria {
        match self {
            ActionBuilder::Delegate(_) => EventCriteria::new(vec![
                ExpectedEvent::new(EVENT_TYPE_MESSAGE).with_value(ATTRIBUTE_KEY_MODULE, MODULE_STAKING),
                ExpectedEvent::new(EVENT_TYPE_DELEGATE).with_key(ATTRIBUTE_KEY_VALIDATOR),
                ExpectedEvent::new(EVENT_TYPE_CREATE_VALIDATOR).with_key(ATTRIBUTE_KEY_VALIDATOR),
            ]),
            ActionBuilder::Vote(_) => EventCriteria::new(vec![
                ExpectedEvent::new(EVENT_TYPE_MESSAGE).with_value(ATTRIBUTE_KEY_MODULE, MODULE_GOV),
                ExpectedEvent::new(EVENT_TYPE_PROPOSAL_VOTE).with_key(ATTRIBUTE_KEY_PROPOSAL_ID),
            ]),
            ActionBuilder::Transfer(_) => EventCriteria::new(vec![
                ExpectedEvent::new(EVENT_TYPE_TRANSFER).with_key(ATTRIBUTE_KEY_SENDER),
                ExpectedEvent::new(EVENT_TYPE_MESSAGE).with_value(ATTRIBUTE_KEY_MODULE, MODULE_BANK),
            ]),
        }
    }

    /// Feed one matching event. On error the builder keeps what it had.
    pub fn add_event(&mut self, event: &AbciEvent) -> Result<()> {
        match self {
            ActionBuilder::Delegate(builder) => builder.add_event(event),
            ActionBuilder::Vote(builder) => builder.add_event(event),
            ActionBuilder::Transfer(builder) => builder.add_event(event),
        }
    }

    pub fn can_build(&self) -> bool {
        match self {
            ActionBuilder::Delegate(b) => b.delegator.is_some() && b.validator.is_some(),
            ActionBuilder::Vote(b) => b.voter.is_some() && b.proposal_id.is_some(),
            ActionBuilder::Transfer(b) => b.sender.is_some() && b.recipient.is_some() && b.bank_message_seen,
        }
    }

    pub fn build_action(&self) -> Result<EvaluationResult> {
        match self {
            ActionBuilder::Delegate(builder) => builder.build_action(),
            ActionBuilder::Vote(builder) => builder.build_action(),
            ActionBuilder::Transfer(builder) => builder.build_action(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ActionBuilder::Delegate(builder) => *builder = DelegateActionBuilder::default(),
            ActionBuilder::Vote(builder) => *builder = VoteActionBuilder::default(),
            ActionBuilder::Transfer(builder) => *builder = TransferActionBuilder::default(),
        }
    }
}

impl QualifyingAction {
    /// A fresh builder for this action's type.
    pub fn builder(&self) -> ActionBuilder {
        match self {
            QualifyingAction::Delegate(_) => ActionBuilder::Delegate(DelegateActionBuilder::default()),
            QualifyingAction::Vote(_) => ActionBuilder::Vote(VoteActionBuilder::default()),
            QualifyingAction::Transfer(_) => ActionBuilder::Transfer(TransferActionBuilder::default()),
        }
    }
}
