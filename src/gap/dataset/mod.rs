pub mod occurrences;
pub mod transactions;

pub use occurrences::{OccurrenceBitSet, Occurrences};
pub use transactions::{BitSetDataset, TransactionDataset};

use super::config::SupportBounds;
use super::Item;

/// Projected database for one pattern of the search tree.
///
/// A dataset is built once for the empty pattern and afterwards only
/// derived through [`Dataset::expand`]; it is never mutated in place.
pub trait Dataset: Sized + Send {
    /// Items that can extend the current pattern in at least
    /// `positive_lower_bound` positive transactions, in ascending order.
    fn compute_possible_extensions(&self) -> Vec<Item>;

    /// Dataset of the pattern extended with `item`, or `None` when the
    /// extended pattern is not frequent enough in the positive transactions.
    fn expand(&self, item: Item) -> Option<Self>;

    fn positive_support(&self) -> usize;

    fn negative_support(&self) -> usize;

    /// Items that may still appear in an extension, ascending.
    fn relevant_items(&self) -> &[Item];

    fn bounds(&self) -> SupportBounds;

    fn is_emerging(&self) -> bool {
        self.negative_support() <= self.bounds().negative_upper_bound
    }
}
