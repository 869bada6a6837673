use super::trie::RedundancyTrie;
use crate::gap::error::{MineError, Result};
use crate::gap::{Item, Pattern};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Verdict of the collector on a freshly found emerging pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectStatus {
    /// No recorded pattern is contained in the new one; it was recorded.
    New,
    /// A recorded pattern is contained, and the match uses the newest item.
    RedundantWithNewest,
    /// A recorded pattern is contained in the pattern without its newest
    /// item, so every extension of that shorter pattern is redundant too.
    RedundantWithoutNewest,
}

#[derive(Debug, Default)]
struct PendingBatch {
    collected: Vec<Pattern>,
    collected_total: usize,
    since_batch: usize,
    batch_in_progress: bool,
    rebuilds: usize,
}

/// Collects emerging patterns and keeps them free of redundancy.
///
/// Patterns are checked against a trie built from earlier batches. The trie
/// is rebuilt from the pending patterns every `batch_size` collections, by
/// whichever worker crosses the threshold, without holding the lock.
#[derive(Debug)]
pub struct BatchFilteringCollector {
    batch_size: usize,
    trie: RwLock<Arc<RedundancyTrie>>,
    state: Mutex<PendingBatch>,
    emerging_items: Mutex<BTreeSet<Item>>,
}

impl BatchFilteringCollector {
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(MineError::InvalidConfig("batch size must be at least 1".to_string()));
        }
        Ok(Self {
            batch_size,
            trie: RwLock::new(Arc::new(RedundancyTrie::new())),
            state: Mutex::new(PendingBatch::default()),
            emerging_items: Mutex::new(BTreeSet::new()),
        })
    }

    /// Offers the emerging pattern `[item] ++ prefix`.
    pub fn collect(&self, prefix: &[Item], item: Item) -> Result<CollectStatus> {
        let mut pattern = Vec::with_capacity(prefix.len() + 1);
        pattern.push(item);
        pattern.extend_from_slice(prefix);

        let trie = self.trie.read().clone();
        match trie.subset_check(&pattern) {
            Some(0) => return Ok(CollectStatus::RedundantWithNewest),
            Some(_) => return Ok(CollectStatus::RedundantWithoutNewest),
            None => {}
        }

        let batch = {
            let mut state = self.state.lock();
            state.collected.push(pattern);
            state.collected_total += 1;
            state.since_batch += 1;
            if state.since_batch >= self.batch_size && !state.batch_in_progress {
                state.batch_in_progress = true;
                state.since_batch = 0;
                Some(std::mem::take(&mut state.collected))
            } else {
                None
            }
        };

        if let Some(batch) = batch {
            self.rebuild(batch)?;
        }
        Ok(CollectStatus::New)
    }

    fn rebuild(&self, batch: Vec<Pattern>) -> Result<()> {
        let batch_len = batch.len();
        let mut trie = RedundancyTrie::new();
        let survivors = filter_into(&mut trie, batch)?;
        debug!(batch = batch_len, survivors = survivors.len(), "rebuilt redundancy trie");

        *self.trie.write() = Arc::new(trie);

        let mut state = self.state.lock();
        state.collected.extend(survivors);
        state.batch_in_progress = false;
        state.rebuilds += 1;
        Ok(())
    }

    /// Records single items that are emerging on their own.
    pub fn record_emerging_items(&self, items: &[Item]) {
        self.emerging_items.lock().extend(items.iter().copied());
    }

    /// Number of patterns accepted by [`collect`](Self::collect) so far.
    pub fn collected_count(&self) -> usize {
        self.state.lock().collected_total
    }

    pub fn rebuild_count(&self) -> usize {
        self.state.lock().rebuilds
    }

    /// Filters all pending patterns one last time and adds the emerging
    /// single items. Sorted by length, then lexicographically.
    pub fn final_results(&self) -> Result<Vec<Pattern>> {
        let mut state = self.state.lock();
        let pending = std::mem::take(&mut state.collected);
        let filtered = filter_non_redundant(pending)?;
        state.collected = filtered.clone();
        drop(state);

        let mut results: Vec<Pattern> = self
            .emerging_items
            .lock()
            .iter()
            .map(|&item| vec![item])
            .collect();
        results.extend(filtered);
        sort_patterns(&mut results);
        Ok(results)
    }
}

/// Keeps the patterns that contain no other pattern of the set as a
/// subsequence. Duplicates collapse to one.
pub fn filter_non_redundant(patterns: Vec<Pattern>) -> Result<Vec<Pattern>> {
    filter_into(&mut RedundancyTrie::new(), patterns)
}

fn filter_into(trie: &mut RedundancyTrie, mut patterns: Vec<Pattern>) -> Result<Vec<Pattern>> {
    sort_patterns(&mut patterns);
    let mut kept = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        if trie.subset_check(&pattern).is_none() {
            trie.insert(&pattern)?;
            kept.push(pattern);
        }
    }
    Ok(kept)
}

fn sort_patterns(patterns: &mut [Pattern]) {
    patterns.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_supersequences_and_duplicates() {
        let patterns = vec![vec![1, 2, 3], vec![2, 3], vec![2, 3], vec![3, 1], vec![4]];
        let filtered = filter_non_redundant(patterns).unwrap();
        assert_eq!(filtered, vec![vec![4], vec![2, 3], vec![3, 1]]);
    }

    #[test]
    fn filter_is_idempotent() {
        let patterns = vec![vec![5, 1, 2], vec![1, 2], vec![2, 1], vec![2, 5, 1], vec![1, 1]];
        let once = filter_non_redundant(patterns).unwrap();
        let twice = filter_non_redundant(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn collect_classifies_against_rebuilt_trie() {
        let collector = BatchFilteringCollector::new(1).unwrap();

        assert_eq!(collector.collect(&[2], 1).unwrap(), CollectStatus::New);
        assert_eq!(collector.rebuild_count(), 1);

        // [1, 2] again: the match needs the newest item 1
        assert_eq!(collector.collect(&[2], 1).unwrap(), CollectStatus::RedundantWithNewest);
        // [7, 1, 2]: covered without the newest item
        assert_eq!(collector.collect(&[1, 2], 7).unwrap(), CollectStatus::RedundantWithoutNewest);
        // [1, 7, 2]: covered, needs the newest item
        assert_eq!(collector.collect(&[7, 2], 1).unwrap(), CollectStatus::RedundantWithNewest);

        assert_eq!(collector.collected_count(), 1);
        assert_eq!(collector.final_results().unwrap(), vec![vec![1, 2]]);
    }

    #[test]
    fn large_batch_defers_filtering_to_final_results() {
        let collector = BatchFilteringCollector::new(1000).unwrap();
        assert_eq!(collector.collect(&[2], 1).unwrap(), CollectStatus::New);
        assert_eq!(collector.collect(&[2], 1).unwrap(), CollectStatus::New);
        assert_eq!(collector.collect(&[1, 2], 7).unwrap(), CollectStatus::New);
        assert_eq!(collector.rebuild_count(), 0);
        assert_eq!(collector.collected_count(), 3);

        assert_eq!(collector.final_results().unwrap(), vec![vec![1, 2]]);
        // a second drain sees the already filtered set
        assert_eq!(collector.final_results().unwrap(), vec![vec![1, 2]]);
    }

    #[test]
    fn emerging_items_join_final_results() {
        let collector = BatchFilteringCollector::new(10).unwrap();
        collector.record_emerging_items(&[9, 4]);
        collector.collect(&[3], 2).unwrap();
        assert_eq!(collector.final_results().unwrap(), vec![vec![4], vec![9], vec![2, 3]]);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(BatchFilteringCollector::new(0), Err(MineError::InvalidConfig(_))));
    }
}
