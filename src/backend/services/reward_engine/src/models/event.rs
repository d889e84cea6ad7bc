use shared_models::AbciEvent;

pub const EVENT_TYPE_REWARD_PROGRAM_CREATED: &str = "reward_program_created";
pub const EVENT_TYPE_REWARD_PROGRAM_STARTED: &str = "reward_program_started";
pub const EVENT_TYPE_REWARD_PROGRAM_FINISHED: &str = "reward_program_finished";
pub const EVENT_TYPE_REWARD_PROGRAM_EXPIRED: &str = "reward_program_expired";
pub const EVENT_TYPE_REWARD_PROGRAM_ENDED: &str = "reward_program_ended";
pub const EVENT_TYPE_CLAIM_REWARDS: &str = "claim_rewards";
pub const EVENT_TYPE_CLAIM_ALL_REWARDS: &str = "claim_all_rewards";

pub const ATTRIBUTE_KEY_REWARD_PROGRAM_ID: &str = "reward_program_id";
pub const ATTRIBUTE_KEY_REWARDS_CLAIM_ADDRESS: &str = "rewards_claim_address";

/// Event carrying only the program id, emitted on lifecycle changes.
pub fn program_event(event_type: &str, reward_program_id: u64) -> AbciEvent {
    AbciEvent::new(event_type).with_attribute(ATTRIBUTE_KEY_REWARD_PROGRAM_ID, reward_program_id.to_string())
}

/// One event shape an action is assembled from. An attribute with no value
/// only has to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedEvent {
    pub event_type: String,
    pub attributes: Vec<(String, Option<Vec<u8>>)>,
}

impl ExpectedEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.attributes.push((key.into(), None));
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.attributes.push((key.into(), Some(value.as_ref().to_vec())));
        self
    }

    pub fn matches(&self, event: &AbciEvent) -> bool {
        if self.event_type != event.event_type {
            return false;
        }

        self.attributes.iter().all(|(key, expected)| match (event.attribute(key), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected.as_slice(),
        })
    }
}

/// Ordered set of event shapes relevant to one action type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCriteria {
    pub events: Vec<ExpectedEvent>,
}

impl EventCriteria {
    pub fn new(events: Vec<ExpectedEvent>) -> Self {
        Self { events }
    }

    /// Whether any expected event has this type. Empty criteria match everything.
    pub fn matches_event_type(&self, event_type: &str) -> bool {
        self.events.is_empty() || self.events.iter().any(|expected| expected.event_type == event_type)
    }

    pub fn matches(&self, event: &AbciEvent) -> bool {
        self.events.is_empty() || self.events.iter().any(|expected| expected.matches(event))
    }
}
