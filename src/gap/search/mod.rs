pub mod engine;
pub mod executor;

pub use engine::{expand_node, NodeOutcome, SearchNode};
pub use executor::{DepthFirstExecutor, ExecutorStats};
