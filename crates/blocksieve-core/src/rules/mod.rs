pub mod dedupe;
pub mod filter;

pub use dedupe::{dedupe, DedupeOutcome};
pub use filter::{count_valid, partition, Partition};
