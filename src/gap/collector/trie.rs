use crate::gap::error::{MineError, Result};
use crate::gap::Item;
use std::collections::HashMap;

const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    pub children: HashMap<Item, usize>,
}

impl TrieNode {
    /// A node without children ends a recorded pattern.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Recorded patterns stored last item first, in an arena of nodes.
#[derive(Debug, Clone)]
pub struct RedundancyTrie {
    nodes: Vec<TrieNode>,
}

impl Default for RedundancyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl RedundancyTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::default()] }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].is_leaf()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Records `pattern`. The pattern must not contain a recorded pattern,
    /// and no recorded pattern may run through its path.
    pub fn insert(&mut self, pattern: &[Item]) -> Result<()> {
        if pattern.is_empty() {
            return Err(MineError::TrieInvariant("cannot record an empty pattern".to_string()));
        }

        let mut current = ROOT;
        for &item in pattern.iter().rev() {
            match self.nodes[current].children.get(&item) {
                Some(&child) => {
                    if self.nodes[child].is_leaf() {
                        return Err(MineError::TrieInvariant(format!(
                            "{pattern:?} extends an already recorded pattern"
                        )));
                    }
                    current = child;
                }
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(item, child);
                    current = child;
                }
            }
        }

        if !self.nodes[current].is_leaf() {
            return Err(MineError::TrieInvariant(format!(
                "{pattern:?} is a suffix of an already recorded pattern"
            )));
        }
        Ok(())
    }

    /// Looks for a recorded pattern that is a subsequence of `pattern`,
    /// consuming `pattern` from its last item towards its first.
    ///
    /// Returns the index of `pattern` where the first complete match ends,
    /// so `Some(0)` means the match needed the first item.
    pub fn subset_check(&self, pattern: &[Item]) -> Option<usize> {
        self.walk(ROOT, pattern, pattern.len())
    }

    fn walk(&self, node: usize, pattern: &[Item], end: usize) -> Option<usize> {
        for i in (0..end).rev() {
            let Some(&child) = self.nodes[node].children.get(&pattern[i]) else {
                continue;
            };
            if self.nodes[child].is_leaf() {
                return Some(i);
            }
            if let Some(found) = self.walk(child, pattern, i) {
                return Some(found);
            }
        }
        None
    }
}
