use crate::gap::collector::{BatchFilteringCollector, CollectStatus};
use crate::gap::dataset::Dataset;
use crate::gap::error::Result;
use crate::gap::Pattern;

/// A pattern waiting to be expanded, with its projected dataset.
#[derive(Debug)]
pub struct SearchNode<D> {
    pub dataset: D,
    pub pattern: Pattern,
}

impl<D: Dataset> SearchNode<D> {
    pub fn root(dataset: D) -> Self {
        Self { dataset, pattern: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Every extension was tried.
    Exhausted { children: usize },
    /// The pattern turned out to contain a recorded pattern, remaining
    /// extensions were skipped.
    Closed { children: usize },
}

/// Expands one node: emerging extensions go to the collector, the others
/// are handed to `push` for later expansion.
pub fn expand_node<D, F>(
    node: SearchNode<D>,
    collector: &BatchFilteringCollector,
    mut push: F,
) -> Result<NodeOutcome>
where
    D: Dataset,
    F: FnMut(SearchNode<D>),
{
    let SearchNode { dataset, pattern } = node;
    let mut children = 0;

    for item in dataset.compute_possible_extensions() {
        let Some(child) = dataset.expand(item) else {
            continue;
        };

        if child.is_emerging() {
            match collector.collect(&pattern, item)? {
                CollectStatus::New | CollectStatus::RedundantWithNewest => {}
                CollectStatus::RedundantWithoutNewest => {
                    return Ok(NodeOutcome::Closed { children });
                }
            }
            continue;
        }

        let mut extended = Vec::with_capacity(pattern.len() + 1);
        extended.push(item);
        extended.extend_from_slice(&pattern);
        push(SearchNode { dataset: child, pattern: extended });
        children += 1;
    }

    Ok(NodeOutcome::Exhausted { children })
}
