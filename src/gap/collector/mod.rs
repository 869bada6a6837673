pub mod batch;
pub mod trie;

pub use batch::{filter_non_redundant, BatchFilteringCollector, CollectStatus};
pub use trie::{RedundancyTrie, TrieNode};
