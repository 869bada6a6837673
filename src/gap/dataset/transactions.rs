use super::occurrences::{OccurrenceBitSet, Occurrences};
use super::Dataset;
use crate::gap::config::SupportBounds;
use crate::gap::error::Result;
use crate::gap::Item;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type BitSetDataset = TransactionDataset<OccurrenceBitSet>;

/// Transactions of one polarity plus, per transaction, the positions of
/// every item it contains. Shared read-only by all datasets of a run.
#[derive(Debug)]
struct Collection<O> {
    transactions: Vec<Vec<Item>>,
    index: Vec<HashMap<Item, O>>,
}

impl<O: Occurrences> Collection<O> {
    fn build(transactions: Vec<Vec<Item>>) -> Self {
        let index = transactions
            .par_iter()
            .map(|transaction| {
                let mut positions: HashMap<Item, Vec<usize>> = HashMap::new();
                for (pos, &item) in transaction.iter().enumerate() {
                    positions.entry(item).or_default().push(pos);
                }
                positions
                    .into_iter()
                    .map(|(item, pos)| (item, O::from_positions(pos)))
                    .collect()
            })
            .collect();
        Self { transactions, index }
    }

    /// Number of transactions containing each item.
    fn item_counts(&self) -> HashMap<Item, usize> {
        let mut counts = HashMap::new();
        for positions in &self.index {
            for &item in positions.keys() {
                *counts.entry(item).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// The surviving transactions of one polarity for the current pattern.
#[derive(Debug, Clone)]
struct Side<O> {
    collection: Arc<Collection<O>>,
    // original transaction index of every surviving transaction
    mapping: Vec<usize>,
    occurrences: Vec<O>,
    reachable: Vec<O>,
}

impl<O: Occurrences> Side<O> {
    fn root(collection: Arc<Collection<O>>, gap: usize) -> Self {
        // the empty pattern matches everywhere, including one past the end
        let occurrences: Vec<O> = collection
            .transactions
            .iter()
            .map(|transaction| O::from_positions(0..=transaction.len()))
            .collect();
        let reachable = occurrences.iter().map(|occ| occ.reachable(gap)).collect();
        Self {
            mapping: (0..collection.transactions.len()).collect(),
            collection,
            occurrences,
            reachable,
        }
    }

    fn support(&self) -> usize {
        self.mapping.len()
    }

    fn transaction(&self, i: usize) -> &[Item] {
        &self.collection.transactions[self.mapping[i]]
    }

    fn positions(&self, i: usize, item: Item) -> Option<&O> {
        self.collection.index[self.mapping[i]].get(&item)
    }

    /// Restricts the side to the transactions where `item` can be prepended
    /// to the current pattern. Gives up as soon as fewer than `min_survivors`
    /// transactions can remain.
    fn project(&self, item: Item, gap: usize, min_survivors: usize) -> Option<Self> {
        let total = self.support();
        let mut mapping = Vec::new();
        let mut occurrences = Vec::new();

        for i in 0..total {
            if mapping.len() + (total - i) < min_survivors {
                return None;
            }
            let Some(item_positions) = self.positions(i, item) else {
                continue;
            };
            let matched = self.reachable[i].intersection(item_positions);
            if !matched.is_empty() {
                mapping.push(self.mapping[i]);
                occurrences.push(matched);
            }
        }

        if mapping.len() < min_survivors {
            return None;
        }

        let reachable = occurrences.iter().map(|occ| occ.reachable(gap)).collect();
        Some(Self {
            collection: Arc::clone(&self.collection),
            mapping,
            occurrences,
            reachable,
        })
    }

    /// Whether `item` occurs before the last match in at least `needed` transactions.
    fn occurs_before_last(&self, item: Item, needed: usize) -> bool {
        (0..self.support())
            .filter(|&i| match (self.positions(i, item), self.occurrences[i].last()) {
                (Some(positions), Some(last)) => positions.has_before(last),
                _ => false,
            })
            .take(needed)
            .count()
            >= needed
    }

    fn iter_occurrences(&self) -> impl Iterator<Item = (usize, &O)> + '_ {
        self.mapping.iter().copied().zip(self.occurrences.iter())
    }
}

/// Dataset backed by the raw transactions of both polarities.
///
/// Patterns grow leftwards: expanding with `e` turns pattern `P` into
/// `[e] ++ P`, so the occurrence structures hold the positions where the
/// newest item is matched.
#[derive(Debug, Clone)]
pub struct TransactionDataset<O: Occurrences = OccurrenceBitSet> {
    gap: usize,
    bounds: SupportBounds,
    positive: Side<O>,
    negative: Side<O>,
    relevant_items: Vec<Item>,
    emerging_items: Vec<Item>,
}

impl<O: Occurrences> TransactionDataset<O> {
    /// Root dataset for the empty pattern.
    pub fn new(
        positive: Vec<Vec<Item>>,
        negative: Vec<Vec<Item>>,
        gap: usize,
        bounds: SupportBounds,
    ) -> Result<Self> {
        bounds.validate(positive.len())?;

        let (positive, negative) = rayon::join(
            || Arc::new(Collection::<O>::build(positive)),
            || Arc::new(Collection::<O>::build(negative)),
        );

        let negative_counts = negative.item_counts();
        let mut relevant_items = Vec::new();
        let mut emerging_items = Vec::new();
        for (item, count) in positive.item_counts() {
            if count < bounds.positive_lower_bound {
                continue;
            }
            let negative_count = negative_counts.get(&item).copied().unwrap_or(0);
            if negative_count <= bounds.negative_upper_bound {
                emerging_items.push(item);
            } else {
                relevant_items.push(item);
            }
        }
        relevant_items.sort_unstable();
        emerging_items.sort_unstable();

        Ok(Self {
            gap,
            bounds,
            positive: Side::root(positive, gap),
            negative: Side::root(negative, gap),
            relevant_items,
            emerging_items,
        })
    }

    /// Single items that are emerging on their own. Only the root dataset
    /// reports them; they are left out of `relevant_items` since any longer
    /// pattern containing one is redundant.
    pub fn emerging_items(&self) -> &[Item] {
        &self.emerging_items
    }

    /// `(original transaction index, occurrences)` of every surviving positive transaction.
    pub fn positive_occurrences(&self) -> impl Iterator<Item = (usize, &O)> + '_ {
        self.positive.iter_occurrences()
    }

    pub fn negative_occurrences(&self) -> impl Iterator<Item = (usize, &O)> + '_ {
        self.negative.iter_occurrences()
    }

    fn is_relevant(&self, item: Item) -> bool {
        self.relevant_items.binary_search(&item).is_ok()
    }
}

impl<O: Occurrences> Dataset for TransactionDataset<O> {
    fn compute_possible_extensions(&self) -> Vec<Item> {
        let mut counts: HashMap<Item, usize> = HashMap::new();
        let mut in_transaction: HashSet<Item> = HashSet::new();

        for (i, occurrences) in self.positive.occurrences.iter().enumerate() {
            let transaction = self.positive.transaction(i);
            let mut window_floor = 0;
            for end in occurrences.positions() {
                let start = end.saturating_sub(self.gap + 1).max(window_floor);
                for &item in &transaction[start..end] {
                    if self.is_relevant(item) {
                        in_transaction.insert(item);
                    }
                }
                window_floor = end;
            }
            for item in in_transaction.drain() {
                *counts.entry(item).or_insert(0) += 1;
            }
        }

        let mut extensions: Vec<Item> = counts
            .into_iter()
            .filter(|&(_, count)| count >= self.bounds.positive_lower_bound)
            .map(|(item, _)| item)
            .collect();
        extensions.sort_unstable();
        extensions
    }

    fn expand(&self, item: Item) -> Option<Self> {
        let needed = self.bounds.positive_lower_bound;
        let positive = self.positive.project(item, self.gap, needed)?;
        let negative = self.negative.project(item, self.gap, 0)?;

        let relevant_items = self
            .relevant_items
            .iter()
            .copied()
            .filter(|&candidate| positive.occurs_before_last(candidate, needed))
            .collect();

        Some(Self {
            gap: self.gap,
            bounds: self.bounds,
            positive,
            negative,
            relevant_items,
            emerging_items: Vec::new(),
        })
    }

    fn positive_support(&self) -> usize {
        self.positive.support()
    }

    fn negative_support(&self) -> usize {
        self.negative.support()
    }

    fn relevant_items(&self) -> &[Item] {
        &self.relevant_items
    }

    fn bounds(&self) -> SupportBounds {
        self.bounds
    }
}
