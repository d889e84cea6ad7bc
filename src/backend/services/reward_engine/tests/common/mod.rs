#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::mock;
use reward_engine::models::{ActionTransfer, Delegation, ProgramTerms, QualifyingAction, Validator};
use reward_engine::{BankKeeper, Context, MemoryStore, RewardConfig, RewardKeeper, StakingKeeper};
use shared_models::{AbciEvent, AccAddress, BlockHeader, Coin, ValAddress};

pub const DENOM: &str = "nhash";
pub const CLAIM_PERIOD_SECONDS: u64 = 100;

mock! {
    pub Staking {}

    impl StakingKeeper for Staking {
        fn get_validator(&self, address: &ValAddress) -> Option<Validator>;
        fn get_delegation(&self, delegator: &AccAddress, validator: &ValAddress) -> Option<Delegation>;
        fn get_all_delegator_delegations(&self, delegator: &AccAddress) -> Vec<Delegation>;
        fn get_bonded_validators_by_power(&self) -> Vec<Validator>;
    }
}

mock! {
    pub Bank {}

    impl BankKeeper for Bank {
        fn spendable_coins(&self, address: &AccAddress) -> Vec<Coin>;
        fn send_coins_from_account_to_module(&self, sender: &AccAddress, module: &str, amount: &Coin) -> Result<()>;
        fn send_coins_from_module_to_account(&self, module: &str, recipient: &AccAddress, amounts: &[Coin]) -> Result<()>;
    }
}

/// Staking module with no validators and no delegations.
#[derive(Debug, Default)]
pub struct EmptyStaking;

impl StakingKeeper for EmptyStaking {
    fn get_validator(&self, _address: &ValAddress) -> Option<Validator> {
        None
    }

    fn get_delegation(&self, _delegator: &AccAddress, _validator: &ValAddress) -> Option<Delegation> {
        None
    }

    fn get_all_delegator_delegations(&self, _delegator: &AccAddress) -> Vec<Delegation> {
        Vec::new()
    }

    fn get_bonded_validators_by_power(&self) -> Vec<Validator> {
        Vec::new()
    }
}

/// In-memory bank with account and module balances.
#[derive(Debug, Default)]
pub struct TestBank {
    balances: Mutex<BTreeMap<(String, String), u128>>,
}

impl TestBank {
    fn module_holder(module: &str) -> String {
        format!("module/{module}")
    }

    pub fn fund(&self, address: &AccAddress, coin: &Coin) {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry((address.to_string(), coin.denom.clone())).or_default() += coin.amount;
    }

    pub fn balance(&self, address: &AccAddress) -> u128 {
        self.holder_balance(&address.to_string())
    }

    pub fn module_balance(&self, module: &str) -> u128 {
        self.holder_balance(&Self::module_holder(module))
    }

    /// Move a module's whole balance to `to`.
    pub fn drain_module(&self, module: &str, to: &AccAddress) {
        let amount = self.module_balance(module);
        self.transfer(Self::module_holder(module), to.to_string(), &[coin(amount)])
            .unwrap();
    }

    pub fn fund_module(&self, module: &str, amount: u128) {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry((Self::module_holder(module), DENOM.to_string())).or_default() += amount;
    }

    /// Move part of a module's balance to `to`.
    pub fn take_from_module(&self, module: &str, to: &AccAddress, amount: u128) {
        self.transfer(Self::module_holder(module), to.to_string(), &[coin(amount)])
            .unwrap();
    }

    fn holder_balance(&self, holder: &str) -> u128 {
        let balances = self.balances.lock().unwrap();
        balances
            .get(&(holder.to_string(), DENOM.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Moves all of `amounts` or, when any one is short, nothing.
    fn transfer(&self, from: String, to: String, amounts: &[Coin]) -> Result<()> {
        let mut balances = self.balances.lock().unwrap();
        for amount in amounts {
            let available = balances
                .get(&(from.clone(), amount.denom.clone()))
                .copied()
                .unwrap_or_default();
            if available < amount.amount {
                return Err(anyhow!("{from} has insufficient funds for {amount}"));
            }
        }
        for amount in amounts {
            *balances.entry((from.clone(), amount.denom.clone())).or_default() -= amount.amount;
            *balances.entry((to.clone(), amount.denom.clone())).or_default() += amount.amount;
        }
        Ok(())
    }
}

impl BankKeeper for TestBank {
    fn spendable_coins(&self, address: &AccAddress) -> Vec<Coin> {
        let holder = address.to_string();
        let balances = self.balances.lock().unwrap();
        balances
            .iter()
            .filter(|((owner, _), _)| *owner == holder)
            .map(|((_, denom), amount)| Coin::new(denom.clone(), *amount))
            .collect()
    }

    fn send_coins_from_account_to_module(&self, sender: &AccAddress, module: &str, amount: &Coin) -> Result<()> {
        self.transfer(sender.to_string(), Self::module_holder(module), std::slice::from_ref(amount))
    }

    fn send_coins_from_module_to_account(&self, module: &str, recipient: &AccAddress, amounts: &[Coin]) -> Result<()> {
        self.transfer(Self::module_holder(module), recipient.to_string(), amounts)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn address(byte: u8) -> AccAddress {
    AccAddress::new(vec![byte; 20]).unwrap()
}

pub fn validator_address(byte: u8) -> ValAddress {
    ValAddress::new(vec![byte; 20]).unwrap()
}

pub fn coin(amount: u128) -> Coin {
    Coin::new(DENOM, amount)
}

/// Block time `seconds` after the test epoch.
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
}

pub fn header(seconds: i64) -> BlockHeader {
    BlockHeader::new(seconds as u64 + 1, at(seconds))
}

pub fn transfer_action() -> QualifyingAction {
    QualifyingAction::Transfer(ActionTransfer {
        minimum_actions: 0,
        maximum_actions: 0,
        minimum_delegation_amount: coin(0),
    })
}

pub fn terms(funder: &AccAddress, pool: u128, max_reward: u128, claim_periods: u64) -> ProgramTerms {
    ProgramTerms {
        title: "test program".to_string(),
        description: "rewards transfers".to_string(),
        distribute_from_address: funder.clone(),
        total_reward_pool: coin(pool),
        max_reward_by_address: coin(max_reward),
        program_start_time: at(0),
        claim_period_seconds: CLAIM_PERIOD_SECONDS,
        claim_periods,
        max_rollover_claim_periods: 0,
        expire_claim_periods: 1,
        qualifying_actions: vec![transfer_action()],
    }
}

/// A bank send as the chain logs it: the transfer plus its bank message.
pub fn transfer_events(sender: &AccAddress, recipient: &AccAddress) -> Vec<AbciEvent> {
    vec![
        AbciEvent::new("transfer")
            .with_attribute("recipient", recipient.to_string())
            .with_attribute("sender", sender.to_string())
            .with_attribute("amount", format!("1{DENOM}")),
        AbciEvent::new("message")
            .with_attribute("action", "/cosmos.bank.v1beta1.MsgSend")
            .with_attribute("sender", sender.to_string())
            .with_attribute("module", "bank"),
    ]
}

pub struct TestEnv<S: StakingKeeper> {
    pub store: MemoryStore,
    pub bank: Arc<TestBank>,
    pub keeper: RewardKeeper<TestBank, S>,
}

impl<S: StakingKeeper> TestEnv<S> {
    /// Run `f` in a context at block time `seconds` with `events` as the block's log.
    pub fn at_block<T>(
        &mut self,
        seconds: i64,
        events: &[AbciEvent],
        f: impl FnOnce(&RewardKeeper<TestBank, S>, &mut Context<'_>) -> T,
    ) -> T {
        let mut ctx = Context::new(header(seconds), events, &mut self.store);
        f(&self.keeper, &mut ctx)
    }

    /// Run begin and end blockers, returning the events the engine emitted.
    pub fn run_block(&mut self, seconds: i64, events: &[AbciEvent]) -> reward_engine::Result<Vec<AbciEvent>> {
        self.at_block(seconds, events, |keeper, ctx| {
            keeper.begin_blocker(ctx)?;
            keeper.end_blocker(ctx)?;
            Ok(ctx.take_emitted_events())
        })
    }

    /// Fund `funder` and create a program from `terms` at block time zero.
    pub fn create_program(&mut self, terms: ProgramTerms) -> reward_engine::Result<u64> {
        self.bank.fund(&terms.distribute_from_address, &terms.total_reward_pool);
        self.at_block(0, &[], |keeper, ctx| keeper.create_reward_program(ctx, terms))
    }
}

pub fn event_types(events: &[AbciEvent]) -> Vec<&str> {
    events.iter().map(|event| event.event_type.as_str()).collect()
}

pub fn setup_with<S: StakingKeeper>(staking: S, config: RewardConfig) -> TestEnv<S> {
    init_tracing();
    let bank = Arc::new(TestBank::default());
    let keeper = RewardKeeper::new(bank.clone(), Arc::new(staking), config);
    TestEnv {
        store: MemoryStore::new(),
        bank,
        keeper,
    }
}

pub fn setup() -> TestEnv<EmptyStaking> {
    setup_with(EmptyStaking, RewardConfig::default())
}
