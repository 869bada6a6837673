pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod mining;
pub mod search;
pub mod utils;


/// An opaque symbol of a transaction.
pub type Item = u32;

/// Items in transaction order.
pub type Pattern = Vec<Item>;

pub use collector::{filter_non_redundant, BatchFilteringCollector, CollectStatus, RedundancyTrie};
pub use config::{MinerConfig, SupportBounds};
pub use dataset::{BitSetDataset, Dataset, OccurrenceBitSet, Occurrences, TransactionDataset};
pub use error::MineError;
pub use mining::mine_emerging_patterns;
pub use search::{DepthFirstExecutor, ExecutorStats, SearchNode};
pub use utils::{group_by_length, PatternLevel};
