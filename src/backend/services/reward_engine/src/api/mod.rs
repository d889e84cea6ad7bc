pub mod msg_server;
pub mod msgs;

pub use msg_server::MsgServer;
pub use msgs::{
    MsgClaimAllRewardsRequest, MsgClaimAllRewardsResponse, MsgClaimRewardsRequest, MsgClaimRewardsResponse,
    MsgCreateRewardProgramRequest, MsgCreateRewardProgramResponse, MsgEndRewardProgramRequest,
};
