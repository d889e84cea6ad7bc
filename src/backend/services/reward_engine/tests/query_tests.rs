mod common;

use anyhow::Result;
use reward_engine::models::ClaimStatus;
use reward_engine::services::{PageRequest, RewardProgramQueryType};
use reward_engine::{RewardConfig, RewardError};

use common::*;

/// Program 1 finished, program 2 running, program 3 pending, with address 2
/// having earned in the first period of the first two.
fn populated_env() -> Result<TestEnv<EmptyStaking>> {
    let mut env = setup();
    let funder = address(1);
    env.create_program(terms(&funder, 1_000, 300, 1))?;
    env.create_program(terms(&funder, 900, 900, 3))?;
    let mut later = terms(&funder, 500, 500, 1);
    later.program_start_time = at(500);
    env.create_program(later)?;

    env.run_block(0, &[])?;
    env.run_block(10, &transfer_events(&address(2), &funder))?;
    env.run_block(100, &[])?;
    Ok(env)
}

fn ids(programs: &[reward_engine::models::RewardProgram]) -> Vec<u64> {
    programs.iter().map(|program| program.id).collect()
}

#[test]
fn test_reward_programs_by_query_type() -> Result<()> {
    let env = populated_env()?;
    let all = PageRequest::default();

    let cases = [
        (RewardProgramQueryType::All, vec![1, 2, 3]),
        (RewardProgramQueryType::Pending, vec![3]),
        (RewardProgramQueryType::Active, vec![2]),
        (RewardProgramQueryType::Outstanding, vec![2, 3]),
        (RewardProgramQueryType::Finished, vec![1]),
        (RewardProgramQueryType::Expired, vec![]),
    ];
    for (query_type, expected) in cases {
        let page = env.keeper.reward_programs(&env.store, query_type, &all)?;
        assert_eq!(ids(&page.items), expected, "{query_type:?}");
        assert_eq!(page.pagination.total, expected.len());
    }

    let program = env.keeper.reward_program_by_id(&env.store, 2)?;
    assert_eq!(program.current_claim_period, 2);
    let err = env.keeper.reward_program_by_id(&env.store, 99).unwrap_err();
    assert!(matches!(err, RewardError::ProgramNotFound(99)));
    Ok(())
}

#[test]
fn test_pagination() -> Result<()> {
    let env = populated_env()?;

    let first = env.keeper.reward_programs(
        &env.store,
        RewardProgramQueryType::All,
        &PageRequest {
            offset: 0,
            limit: Some(2),
        },
    )?;
    assert_eq!(ids(&first.items), vec![1, 2]);
    assert_eq!(first.pagination.total, 3);
    assert_eq!(first.pagination.next_offset, Some(2));

    let second = env.keeper.reward_programs(
        &env.store,
        RewardProgramQueryType::All,
        &PageRequest {
            offset: 2,
            limit: Some(2),
        },
    )?;
    assert_eq!(ids(&second.items), vec![3]);
    assert_eq!(second.pagination.next_offset, None);

    let past_end = env.keeper.reward_programs(
        &env.store,
        RewardProgramQueryType::All,
        &PageRequest {
            offset: 10,
            limit: None,
        },
    )?;
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.pagination.total, 3);
    Ok(())
}

#[test]
fn test_page_limits_come_from_config() -> Result<()> {
    let config = RewardConfig {
        default_page_limit: 2,
        max_page_limit: 5,
        ..RewardConfig::default()
    };
    let mut env = setup_with(EmptyStaking, config);
    for _ in 0..7 {
        env.create_program(terms(&address(1), 100, 100, 1))?;
    }

    let default_page = env
        .keeper
        .reward_programs(&env.store, RewardProgramQueryType::Pending, &PageRequest::default())?;
    assert_eq!(default_page.items.len(), 2);

    // Zero means the default, anything past the maximum is capped
    let zero = PageRequest {
        offset: 0,
        limit: Some(0),
    };
    assert_eq!(
        env.keeper
            .reward_programs(&env.store, RewardProgramQueryType::Pending, &zero)?
            .items
            .len(),
        2
    );
    let huge = PageRequest {
        offset: 0,
        limit: Some(50),
    };
    let capped = env
        .keeper
        .reward_programs(&env.store, RewardProgramQueryType::Pending, &huge)?;
    assert_eq!(capped.items.len(), 5);
    assert_eq!(capped.pagination.next_offset, Some(5));
    Ok(())
}

#[test]
fn test_claim_period_reward_distributions() -> Result<()> {
    let env = populated_env()?;

    let page = env
        .keeper
        .claim_period_reward_distributions(&env.store, &PageRequest::default())?;
    let keys: Vec<(u64, u64)> = page
        .items
        .iter()
        .map(|distribution| (distribution.reward_program_id, distribution.claim_period_id))
        .collect();
    assert_eq!(keys, vec![(1, 1), (2, 1), (2, 2)]);

    let distribution = env.keeper.claim_period_reward_distribution_by_id(&env.store, 2, 1)?;
    assert!(distribution.claim_period_ended);
    assert_eq!(distribution.rewards_pool, coin(300));
    assert_eq!(distribution.total_shares, 1);

    let err = env
        .keeper
        .claim_period_reward_distribution_by_id(&env.store, 2, 9)
        .unwrap_err();
    assert!(matches!(err, RewardError::NotFound(_)));
    Ok(())
}

#[test]
fn test_reward_distributions_by_address() -> Result<()> {
    let mut env = populated_env()?;
    let alice = address(2);
    let all = PageRequest::default();

    let page = env
        .keeper
        .reward_distributions_by_address(&env.store, &alice, None, &all)?;
    let rewards: Vec<(u64, u64, u128)> = page
        .items
        .iter()
        .map(|item| (item.reward_program_id, item.claim_id, item.total_reward_claim.amount))
        .collect();
    assert_eq!(rewards, vec![(1, 1, 300), (2, 1, 300)]);
    assert!(page.items.iter().all(|item| item.claim_status == ClaimStatus::Claimable));

    env.at_block(101, &[], |keeper, ctx| keeper.claim_rewards(ctx, 1, &alice))?;

    let claimed = env
        .keeper
        .reward_distributions_by_address(&env.store, &alice, Some(ClaimStatus::Claimed), &all)?;
    assert_eq!(claimed.items.len(), 1);
    assert_eq!(claimed.items[0].reward_program_id, 1);

    let nobody = env
        .keeper
        .reward_distributions_by_address(&env.store, &address(8), None, &all)?;
    assert!(nobody.items.is_empty());
    assert_eq!(nobody.pagination.total, 0);
    Ok(())
}
