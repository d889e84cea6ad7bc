use tracing::{debug, trace};

use crate::context::Context;
use crate::models::ProposalStatus;
use crate::repositories::{BankKeeper, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::utils::Result;

/// Callbacks the epoch module invokes at epoch boundaries.
pub trait EpochHooks {
    fn before_epoch_start(&self, ctx: &mut Context<'_>, epoch_identifier: &str, epoch_number: u64) -> Result<()>;
    fn after_epoch_end(&self, ctx: &mut Context<'_>, epoch_identifier: &str, epoch_number: u64) -> Result<()>;
}

/// Callbacks the governance module invokes as proposals move through voting.
pub trait GovHooks {
    fn after_proposal_submission(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<()>;
    fn after_proposal_voting_period_ended(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<()>;
}

impl<B: BankKeeper, S: StakingKeeper> EpochHooks for RewardKeeper<B, S> {
    fn before_epoch_start(&self, _ctx: &mut Context<'_>, epoch_identifier: &str, epoch_number: u64) -> Result<()> {
        trace!(epoch_identifier, epoch_number, "epoch starting");
        Ok(())
    }

    fn after_epoch_end(&self, ctx: &mut Context<'_>, epoch_identifier: &str, epoch_number: u64) -> Result<()> {
        if self.config().cleanup_epoch_identifier.as_deref() != Some(epoch_identifier) {
            return Ok(());
        }
        debug!(epoch_identifier, epoch_number, "running reward program cleanup");
        self.cleanup(ctx)
    }
}

impl<B: BankKeeper, S: StakingKeeper> GovHooks for RewardKeeper<B, S> {
    fn after_proposal_submission(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<()> {
        ctx.store_mut().set_proposal_status(proposal_id, ProposalStatus::VotingPeriod)
    }

    fn after_proposal_voting_period_ended(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<()> {
        debug!(proposal_id, "proposal voting period ended");
        ctx.store_mut().set_proposal_status(proposal_id, ProposalStatus::VotingEnded)
    }
}
