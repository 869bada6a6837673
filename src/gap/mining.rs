use super::collector::BatchFilteringCollector;
use super::config::MinerConfig;
use super::dataset::BitSetDataset;
use super::error::Result;
use super::search::{DepthFirstExecutor, SearchNode};
use super::{Item, Pattern};
use std::sync::Arc;
use tracing::info;

/// Mines the non-redundant emerging patterns of `positive` against `negative`.
///
/// Results are sorted by length, then lexicographically.
pub fn mine_emerging_patterns(
    positive: Vec<Vec<Item>>,
    negative: Vec<Vec<Item>>,
    config: &MinerConfig,
) -> Result<Vec<Pattern>> {
    config.validate(positive.len())?;
    config.check_lengths(&positive)?;
    config.check_lengths(&negative)?;

    info!(
        positive = positive.len(),
        negative = negative.len(),
        gap = config.gap,
        positive_lower_bound = config.bounds.positive_lower_bound,
        negative_upper_bound = config.bounds.negative_upper_bound,
        "loading datasets"
    );

    let dataset = BitSetDataset::new(positive, negative, config.gap, config.bounds)?;
    let collector = Arc::new(BatchFilteringCollector::new(config.batch_size)?);
    collector.record_emerging_items(dataset.emerging_items());

    let executor = DepthFirstExecutor::new(config.workers)?;
    let stats = executor.mine(SearchNode::root(dataset), Arc::clone(&collector))?;

    let patterns = collector.final_results()?;
    info!(
        patterns = patterns.len(),
        collected = collector.collected_count(),
        nodes = stats.nodes_expanded,
        "mining complete"
    );
    Ok(patterns)
}
