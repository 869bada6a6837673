use bit_set::BitSet;
use std::fmt::Debug;

/// Set of positions inside one transaction.
///
/// A dataset keeps one of these per surviving transaction: the positions
/// where the newest (leftmost) item of the current pattern is matched.
pub trait Occurrences: Clone + Debug + Send + Sync {
    fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    /// Set positions in ascending order.
    fn positions(&self) -> impl Iterator<Item = usize> + '_;

    fn last(&self) -> Option<usize>;

    /// Whether some position is strictly smaller than `limit`.
    fn has_before(&self, limit: usize) -> bool;

    /// Positions `q` such that `q + k` is set for some `k` in `1..=gap + 1`.
    fn reachable(&self, gap: usize) -> Self;

    fn intersection(&self, other: &Self) -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceBitSet(BitSet);

impl OccurrenceBitSet {
    pub fn new() -> Self {
        Self(BitSet::new())
    }
}

impl Occurrences for OccurrenceBitSet {
    fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        Self(positions.into_iter().collect())
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter()
    }

    fn last(&self) -> Option<usize> {
        self.0.iter().last()
    }

    fn has_before(&self, limit: usize) -> bool {
        self.0.iter().next().is_some_and(|first| first < limit)
    }

    fn reachable(&self, gap: usize) -> Self {
        let mut shifted = BitSet::with_capacity(self.0.capacity());
        for pos in self.0.iter() {
            for back in 1..=(gap + 1).min(pos) {
                shifted.insert(pos - back);
            }
        }
        Self(shifted)
    }

    fn intersection(&self, other: &Self) -> Self {
        let mut both = self.0.clone();
        both.intersect_with(&other.0);
        Self(both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(positions: &[usize]) -> OccurrenceBitSet {
        OccurrenceBitSet::from_positions(positions.iter().copied())
    }

    #[test]
    fn reachable_respects_gap() {
        let occ = set(&[5]);
        assert_eq!(occ.reachable(0).positions().collect::<Vec<_>>(), vec![4]);
        assert_eq!(occ.reachable(2).positions().collect::<Vec<_>>(), vec![2, 3, 4]);
        // nothing sits before position 0
        assert!(set(&[0]).reachable(3).is_empty());
        assert_eq!(set(&[1]).reachable(3).positions().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn reachable_merges_overlapping_windows() {
        let occ = set(&[3, 4]);
        assert_eq!(occ.reachable(1).positions().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn last_and_has_before() {
        let occ = set(&[2, 7, 9]);
        assert_eq!(occ.last(), Some(9));
        assert!(occ.has_before(3));
        assert!(!occ.has_before(2));
        assert_eq!(OccurrenceBitSet::new().last(), None);
        assert!(!OccurrenceBitSet::new().has_before(10));
    }

    #[test]
    fn intersection_keeps_common_positions() {
        let both = set(&[1, 3, 5]).intersection(&set(&[3, 4, 5, 6]));
        assert_eq!(both.positions().collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(both.len(), 2);
        assert!(set(&[1]).intersection(&set(&[2])).is_empty());
    }
}
