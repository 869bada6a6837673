use crate::gap::{Item, Pattern};

/// Flat storage of sequences, item order preserved.
#[derive(Debug, Clone, Default)]
pub struct PatternStorage {
    pub items: Vec<Item>,
    pub offsets: Vec<(usize, usize)>,
}

/// All result patterns of one length.
#[derive(Debug, Clone)]
pub struct PatternLevel {
    pub storage: PatternStorage,
    pub pattern_len: usize,
}

impl PatternStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_pattern(&mut self, pattern: &[Item]) {
        let start = self.items.len();
        self.items.extend_from_slice(pattern);
        self.offsets.push((start, pattern.len()));
    }

    pub(crate) fn get_pattern(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl PatternLevel {
    pub fn new(pattern_len: usize) -> Self {
        Self { storage: PatternStorage::new(), pattern_len }
    }

    pub fn add_pattern(&mut self, pattern: &[Item]) -> usize {
        debug_assert_eq!(pattern.len(), self.pattern_len);
        self.storage.add_pattern(pattern);
        self.storage.len() - 1
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_pattern(&self, idx: usize) -> &[Item] {
        self.storage.get_pattern(idx)
    }

    pub fn iter_patterns(&self) -> impl Iterator<Item = &[Item]> {
        (0..self.storage.len()).map(move |idx| self.get_pattern(idx))
    }
}

/// Groups patterns by length; level `i` holds the patterns of length `i + 1`.
/// Lengths without any pattern yield empty levels.
pub fn group_by_length(patterns: &[Pattern]) -> Vec<PatternLevel> {
    let mut levels: Vec<PatternLevel> = Vec::new();
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        while levels.len() < pattern.len() {
            levels.push(PatternLevel::new(levels.len() + 1));
        }
        levels[pattern.len() - 1].add_pattern(pattern);
    }
    levels
}
