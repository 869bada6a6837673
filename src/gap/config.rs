use super::error::{MineError, Result};
use super::Item;

/// Frequency thresholds that make a pattern emerging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportBounds {
    /// Minimum number of positive transactions a pattern must occur in.
    pub positive_lower_bound: usize,
    /// Maximum number of negative transactions an emerging pattern may occur in.
    pub negative_upper_bound: usize,
}

impl SupportBounds {
    pub fn new(positive_lower_bound: usize, negative_upper_bound: usize) -> Self {
        Self { positive_lower_bound, negative_upper_bound }
    }

    pub fn validate(&self, positive_transactions: usize) -> Result<()> {
        if self.positive_lower_bound == 0 {
            return Err(MineError::InvalidConfig(
                "positive lower bound must be at least 1".to_string(),
            ));
        }
        if self.positive_lower_bound > positive_transactions {
            return Err(MineError::InvalidConfig(format!(
                "positive lower bound {} exceeds the {} positive transactions",
                self.positive_lower_bound, positive_transactions
            )));
        }
        Ok(())
    }
}

impl Default for SupportBounds {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Maximum number of skipped positions between two consecutively matched items.
    pub gap: usize,
    pub bounds: SupportBounds,
    pub workers: usize,
    /// Number of collected patterns between two trie rebuilds.
    pub batch_size: usize,
    pub max_transaction_len: Option<usize>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            gap: 0,
            bounds: SupportBounds::default(),
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            batch_size: 1000,
            max_transaction_len: None,
        }
    }
}

impl MinerConfig {
    pub fn new(gap: usize, positive_lower_bound: usize, negative_upper_bound: usize) -> Self {
        Self {
            gap,
            bounds: SupportBounds::new(positive_lower_bound, negative_upper_bound),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_transaction_len(mut self, max: usize) -> Self {
        self.max_transaction_len = Some(max);
        self
    }

    pub fn validate(&self, positive_transactions: usize) -> Result<()> {
        if self.workers == 0 {
            return Err(MineError::InvalidConfig("worker count must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(MineError::InvalidConfig("batch size must be at least 1".to_string()));
        }
        self.bounds.validate(positive_transactions)
    }

    pub fn check_lengths(&self, transactions: &[Vec<Item>]) -> Result<()> {
        let Some(max) = self.max_transaction_len else {
            return Ok(());
        };
        match transactions.iter().map(Vec::len).find(|&len| len > max) {
            Some(len) => Err(MineError::TransactionTooLong { len, max }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_bounds() {
        assert!(SupportBounds::new(0, 0).validate(3).is_err());
        assert!(SupportBounds::new(4, 0).validate(3).is_err());
        assert!(SupportBounds::new(3, 10).validate(3).is_ok());
    }

    #[test]
    fn rejects_zero_workers_and_batch() {
        let config = MinerConfig::new(1, 1, 0).with_workers(0);
        assert!(matches!(config.validate(1), Err(MineError::InvalidConfig(_))));

        let config = MinerConfig::new(1, 1, 0).with_workers(2).with_batch_size(0);
        assert!(matches!(config.validate(1), Err(MineError::InvalidConfig(_))));
    }

    #[test]
    fn length_cap() {
        let config = MinerConfig::new(0, 1, 0).with_max_transaction_len(2);
        let transactions = vec![vec![1, 2], vec![1, 2, 3]];
        match config.check_lengths(&transactions) {
            Err(MineError::TransactionTooLong { len, max }) => {
                assert_eq!((len, max), (3, 2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(MinerConfig::new(0, 1, 0).check_lengths(&transactions).is_ok());
    }
}
