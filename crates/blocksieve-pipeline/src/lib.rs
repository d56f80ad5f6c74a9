pub mod error;
pub mod job;
pub mod state;
pub mod stats;

pub use error::{ErrorKind, PipelineError, Result};
pub use job::{normalize_column, JobOutcome, JobRequest, Pipeline};
pub use state::{JobState, JobTracker};
pub use stats::StatsAggregator;
