use thiserror::Error;

#[derive(Debug, Error)]
pub enum MineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("transaction of length {len} exceeds the configured maximum of {max}")]
    TransactionTooLong { len: usize, max: usize },

    #[error("redundancy trie invariant violated: {0}")]
    TrieInvariant(String),

    #[error("mining worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("failed to spawn mining worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MineError>;
