pub mod cache_store;
pub mod keys;
pub mod memory_store;
pub mod reward_repository;
pub mod traits;

pub use cache_store::CacheStore;
pub use memory_store::MemoryStore;
pub use reward_repository::RewardRepository;
pub use traits::{BankKeeper, KvStore, StakingKeeper};
