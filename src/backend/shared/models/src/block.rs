use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The parts of a block header modules may depend on. `time` is the only
/// clock a deterministic module is allowed to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockHeader {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }
}
