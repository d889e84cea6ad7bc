use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared_models::{AccAddress, Coin};

use crate::models::action::QualifyingAction;
use crate::utils::{Result, RewardError};

pub const MAX_TITLE_LENGTH: usize = 140;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramState {
    Pending,
    Started,
    Finished,
    Expired,
}

impl ProgramState {
    /// Forward-only transitions of the program lifecycle.
    pub fn can_transition_to(self, next: ProgramState) -> bool {
        matches!(
            (self, next),
            (ProgramState::Pending, ProgramState::Started)
                | (ProgramState::Pending, ProgramState::Finished)
                | (ProgramState::Started, ProgramState::Finished)
                | (ProgramState::Finished, ProgramState::Expired)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramState::Pending => "pending",
            ProgramState::Started => "started",
            ProgramState::Finished => "finished",
            ProgramState::Expired => "expired",
        }
    }
}

/// Creator-supplied terms of a new reward program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTerms {
    pub title: String,
    pub description: String,
    pub distribute_from_address: AccAddress,
    pub total_reward_pool: Coin,
    pub max_reward_by_address: Coin,
    pub program_start_time: DateTime<Utc>,
    pub claim_period_seconds: u64,
    pub claim_periods: u64,
    pub max_rollover_claim_periods: u64,
    pub expire_claim_periods: u64,
    pub qualifying_actions: Vec<QualifyingAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardProgram {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub distribute_from_address: AccAddress,
    pub total_reward_pool: Coin,
    pub remaining_pool_balance: Coin,
    pub claimed_amount: Coin,
    pub max_reward_by_address: Coin,
    pub minimum_rollover_amount: Coin,
    pub claim_period_seconds: u64,
    pub program_start_time: DateTime<Utc>,
    pub expected_program_end_time: DateTime<Utc>,
    pub program_end_time_max: DateTime<Utc>,
    pub claim_period_end_time: Option<DateTime<Utc>>,
    pub actual_program_end_time: Option<DateTime<Utc>>,
    pub claim_periods: u64,
    pub current_claim_period: u64,
    pub max_rollover_claim_periods: u64,
    pub expire_claim_periods: u64,
    pub state: ProgramState,
    pub qualifying_actions: Vec<QualifyingAction>,
}

/// `time + seconds * multiplier`, failing instead of wrapping.
pub fn add_seconds(time: DateTime<Utc>, seconds: u64, multiplier: u64) -> Result<DateTime<Utc>> {
    seconds
        .checked_mul(multiplier)
        .and_then(|total| i64::try_from(total).ok())
        .and_then(Duration::try_seconds)
        .and_then(|duration| time.checked_add_signed(duration))
        .ok_or_else(|| {
            RewardError::InvalidProgramSpec(format!(
                "time overflow adding {multiplier} periods of {seconds} seconds to {time}"
            ))
        })
}

pub fn calculate_expected_end_time(
    start: DateTime<Utc>,
    claim_period_seconds: u64,
    claim_periods: u64,
) -> Result<DateTime<Utc>> {
    add_seconds(start, claim_period_seconds, claim_periods)
}

/// Latest time a program may run until, rollover periods included.
pub fn calculate_end_time_max(
    start: DateTime<Utc>,
    claim_period_seconds: u64,
    claim_periods: u64,
    max_rollover_claim_periods: u64,
) -> Result<DateTime<Utc>> {
    let periods = claim_periods.checked_add(max_rollover_claim_periods).ok_or_else(|| {
        RewardError::InvalidProgramSpec("claim periods plus rollover claim periods overflow".to_string())
    })?;
    add_seconds(start, claim_period_seconds, periods)
}

impl RewardProgram {
    /// Build a Pending program with its full pool remaining.
    pub fn new(id: u64, terms: ProgramTerms) -> Result<Self> {
        let expected_program_end_time =
            calculate_expected_end_time(terms.program_start_time, terms.claim_period_seconds, terms.claim_periods)?;
        let program_end_time_max = calculate_end_time_max(
            terms.program_start_time,
            terms.claim_period_seconds,
            terms.claim_periods,
            terms.max_rollover_claim_periods,
        )?;
        let denom = terms.total_reward_pool.denom.clone();

        Ok(Self {
            id,
            title: terms.title,
            description: terms.description,
            distribute_from_address: terms.distribute_from_address,
            remaining_pool_balance: terms.total_reward_pool.clone(),
            total_reward_pool: terms.total_reward_pool,
            claimed_amount: Coin::zero(denom.clone()),
            max_reward_by_address: terms.max_reward_by_address,
            minimum_rollover_amount: Coin::zero(denom),
            claim_period_seconds: terms.claim_period_seconds,
            program_start_time: terms.program_start_time,
            expected_program_end_time,
            program_end_time_max,
            claim_period_end_time: None,
            actual_program_end_time: None,
            claim_periods: terms.claim_periods,
            current_claim_period: 0,
            max_rollover_claim_periods: terms.max_rollover_claim_periods,
            expire_claim_periods: terms.expire_claim_periods,
            state: ProgramState::Pending,
            qualifying_actions: terms.qualifying_actions,
        })
    }

    pub fn validate_basic(&self) -> Result<()> {
        let invalid = |msg: String| Err(RewardError::InvalidProgramSpec(msg));

        if self.title.trim().is_empty() {
            return invalid("reward program title cannot be blank".to_string());
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return invalid(format!("reward program title is longer than max length of {MAX_TITLE_LENGTH}"));
        }
        if self.description.trim().is_empty() {
            return invalid("reward program description cannot be blank".to_string());
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return invalid(format!(
                "reward program description is longer than max length of {MAX_DESCRIPTION_LENGTH}"
            ));
        }
        if self.id < 1 {
            return invalid("reward program id must be larger than 0".to_string());
        }
        if self.total_reward_pool.validate().is_err() || !self.total_reward_pool.is_positive() {
            return invalid(format!(
                "reward program requires total reward pool to be positive: {}",
                self.total_reward_pool
            ));
        }
        if self.max_reward_by_address.validate().is_err() || !self.max_reward_by_address.is_positive() {
            return invalid(format!(
                "reward program requires positive max reward by address: {}",
                self.max_reward_by_address
            ));
        }
        if self.total_reward_pool.denom != self.max_reward_by_address.denom {
            return invalid(format!(
                "coin denoms differ {} : {}",
                self.total_reward_pool.denom, self.max_reward_by_address.denom
            ));
        }
        if self.max_reward_by_address.amount > self.total_reward_pool.amount {
            return invalid(format!(
                "max claims per address cannot be larger than pool {} : {}",
                self.max_reward_by_address.amount, self.total_reward_pool.amount
            ));
        }
        if self.claim_periods == 0 || self.claim_period_seconds == 0 || self.expire_claim_periods == 0 {
            return invalid(format!(
                "claim periods ({}), claim period seconds ({}), and expire claim periods ({}) must be larger than 0",
                self.claim_periods, self.claim_period_seconds, self.expire_claim_periods
            ));
        }
        if self.qualifying_actions.is_empty() {
            return invalid("reward program must contain qualifying actions".to_string());
        }
        for action in &self.qualifying_actions {
            action.validate_basic()?;
        }

        Ok(())
    }

    /// Move to `next`, refusing anything but a forward transition.
    pub fn transition_to(&mut self, next: ProgramState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(RewardError::InvalidState(format!(
                "reward program {} cannot move from {} to {}",
                self.id,
                self.state.as_str(),
                next.as_str()
            )));
        }
        self.state = next;
        Ok(())
    }

    pub fn is_starting(&self, block_time: DateTime<Utc>) -> bool {
        self.state == ProgramState::Pending && self.program_start_time <= block_time
    }

    pub fn is_ending_claim_period(&self, block_time: DateTime<Utc>) -> bool {
        self.state == ProgramState::Started
            && self.claim_period_end_time.map_or(false, |end| block_time >= end)
    }

    /// Whether the claim period now closing is the program's last one.
    pub fn is_ending(&self, block_time: DateTime<Utc>) -> bool {
        if self.state != ProgramState::Started || self.current_claim_period < self.claim_periods {
            return false;
        }

        let rollovers_exhausted = self.current_claim_period
            >= self.claim_periods.saturating_add(self.max_rollover_claim_periods);
        let below_rollover_minimum = self.remaining_pool_balance.is_zero()
            || self.remaining_pool_balance.amount < self.minimum_rollover_amount.amount;
        let past_end_time_max = block_time >= self.program_end_time_max;

        rollovers_exhausted || below_rollover_minimum || past_end_time_max
    }

    /// Time at which unclaimed rewards of a finished program expire.
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        let end = self.actual_program_end_time?;
        add_seconds(end, self.claim_period_seconds, self.expire_claim_periods).ok()
    }

    pub fn is_expiring(&self, block_time: DateTime<Utc>) -> bool {
        self.state == ProgramState::Finished
            && self.expiration_time().map_or(false, |expires| block_time >= expires)
    }

    /// Pool for the next claim period: an even split of the total pool, never
    /// more than what remains.
    pub fn claim_period_pool(&self) -> Coin {
        let even_split = self.total_reward_pool.amount / self.claim_periods.max(1) as u128;
        Coin::new(
            self.total_reward_pool.denom.clone(),
            even_split.min(self.remaining_pool_balance.amount),
        )
    }

    pub fn has_qualifying_action_type(&self, action_type: &str) -> bool {
        self.qualifying_actions
            .iter()
            .any(|action| action.action_type() == action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::{ActionTransfer, QualifyingAction};
    use chrono::TimeZone;

    fn terms() -> ProgramTerms {
        ProgramTerms {
            title: "title".to_string(),
            description: "description".to_string(),
            distribute_from_address: AccAddress::new(vec![1u8; 20]).unwrap(),
            total_reward_pool: Coin::new("nhash", 100_000),
            max_reward_by_address: Coin::new("nhash", 1_000),
            program_start_time: Utc.with_ymd_and_hms(2024, 12, 2, 0, 0, 0).unwrap(),
            claim_period_seconds: 3_600,
            claim_periods: 3,
            max_rollover_claim_periods: 2,
            expire_claim_periods: 1,
            qualifying_actions: vec![QualifyingAction::Transfer(ActionTransfer {
                minimum_actions: 0,
                maximum_actions: 10,
                minimum_delegation_amount: Coin::new("nhash", 0),
            })],
        }
    }

    #[test]
    fn test_new_program_end_times() {
        let program = RewardProgram::new(1, terms()).unwrap();
        let start = program.program_start_time;
        assert_eq!(program.state, ProgramState::Pending);
        assert_eq!(program.remaining_pool_balance, program.total_reward_pool);
        assert_eq!(program.expected_program_end_time, start + Duration::seconds(3 * 3_600));
        assert_eq!(program.program_end_time_max, start + Duration::seconds(5 * 3_600));
    }

    #[test]
    fn test_validate_basic_messages() {
        let mut program = RewardProgram::new(1, terms()).unwrap();
        assert!(program.validate_basic().is_ok());

        program.max_reward_by_address = Coin::new("nhash", 100_001);
        let err = program.validate_basic().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid reward program: max claims per address cannot be larger than pool 100001 : 100000"
        );

        program.max_reward_by_address = Coin::new("hotdog", 1);
        let err = program.validate_basic().unwrap_err();
        assert_eq!(err.to_string(), "invalid reward program: coin denoms differ nhash : hotdog");

        program.max_reward_by_address = Coin::new("nhash", 1);
        program.id = 0;
        assert!(program.validate_basic().is_err());
    }

    #[test]
    fn test_blank_title_and_description_are_rejected() {
        for (title, description, expected) in [
            (" \t", "description", "invalid reward program: reward program title cannot be blank"),
            ("title", "  \n ", "invalid reward program: reward program description cannot be blank"),
            ("title", "", "invalid reward program: reward program description cannot be blank"),
        ] {
            let mut program = RewardProgram::new(1, terms()).unwrap();
            program.title = title.to_string();
            program.description = description.to_string();
            assert_eq!(program.validate_basic().unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_state_transitions_only_move_forward() {
        let mut program = RewardProgram::new(1, terms()).unwrap();
        assert!(program.transition_to(ProgramState::Started).is_ok());
        assert!(program.transition_to(ProgramState::Pending).is_err());
        assert!(program.transition_to(ProgramState::Expired).is_err());
        assert!(program.transition_to(ProgramState::Finished).is_ok());
        assert!(program.transition_to(ProgramState::Started).is_err());
        assert!(program.transition_to(ProgramState::Expired).is_ok());
    }

    #[test]
    fn test_is_ending() {
        let mut program = RewardProgram::new(1, terms()).unwrap();
        let now = program.program_start_time;
        program.state = ProgramState::Started;
        program.minimum_rollover_amount = Coin::new("nhash", 10_000);

        program.current_claim_period = 2;
        assert!(!program.is_ending(now));

        // planned periods done, enough left to roll over
        program.current_claim_period = 3;
        assert!(!program.is_ending(now));

        program.remaining_pool_balance = Coin::new("nhash", 9_999);
        assert!(program.is_ending(now));

        program.remaining_pool_balance = Coin::new("nhash", 50_000);
        program.current_claim_period = 5;
        assert!(program.is_ending(now));

        program.current_claim_period = 4;
        assert!(program.is_ending(program.program_end_time_max));
    }

    #[test]
    fn test_claim_period_pool_is_capped() {
        let mut program = RewardProgram::new(1, terms()).unwrap();
        assert_eq!(program.claim_period_pool(), Coin::new("nhash", 33_333));
        program.remaining_pool_balance = Coin::new("nhash", 100);
        assert_eq!(program.claim_period_pool(), Coin::new("nhash", 100));
    }
}
