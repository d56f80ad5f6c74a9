use crate::error::{PipelineError, Result};
use crate::state::{JobState, JobTracker};
use crate::stats::StatsAggregator;
use blocksieve_core::{
    count_valid, dedupe, partition, BlocklistSet, JobId, OutputFormat, PhoneNormalizer, PhoneValue,
    ProcessingOptions, ProcessingStats, Row, Table,
};
use blocksieve_source::{BlocklistSource, Result as SourceResult, SourceError};
use blocksieve_store::{
    read_table, Artifact, InputInfo, InputTable, OutputView, OutputWriter, StoreError,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info};

/// Row count from which normalization is spread over the rayon pool.
const PARALLEL_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input: PathBuf,
    pub options: ProcessingOptions,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub stats: ProcessingStats,
    pub artifact: Artifact,
    pub input: InputInfo,
}

struct Prepared {
    input: InputTable,
    phone_column: usize,
    phones: Vec<PhoneValue>,
}

/// Runs jobs against one blocklist source and output location. Each `run`
/// is independent and gets its own job id.
pub struct Pipeline {
    source: Arc<dyn BlocklistSource>,
    normalizer: PhoneNormalizer,
    writer: OutputWriter,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn BlocklistSource>,
        normalizer: PhoneNormalizer,
        writer: OutputWriter,
    ) -> Self {
        Self {
            source: Arc::from(source),
            normalizer,
            writer,
        }
    }

    pub fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    pub fn run(&self, request: &JobRequest) -> Result<JobOutcome> {
        let started = Instant::now();
        let mut tracker = JobTracker::new(JobId::new());
        let result = self.execute(&mut tracker, request, started);
        if result.is_err() {
            tracker.fail();
        }
        result
    }

    fn execute(
        &self,
        tracker: &mut JobTracker,
        request: &JobRequest,
        started: Instant,
    ) -> Result<JobOutcome> {
        let id = tracker.id();
        let mut stats = StatsAggregator::started_at(started);

        if !request.input.is_file() {
            return Err(PipelineError::InputUnreadable(StoreError::InputNotFound(
                request.input.clone(),
            )));
        }

        enter(tracker, JobState::FetchingBlocklist);
        let fetch = self.spawn_fetch()?;

        enter(tracker, JobState::Normalizing);
        // An input failure returns at once; the detached fetch is abandoned.
        let Prepared {
            input,
            phone_column,
            phones,
        } = self.prepare(request)?;
        let blocklist = fetch.join().unwrap_or_else(|_| {
            Err(SourceError::Unavailable(
                "blocklist fetch worker panicked".to_string(),
            ))
        })?;
        stats.record_input(input.table.len(), count_valid(&phones));
        stats.record_blocklist(blocklist.len());

        enter(tracker, JobState::Deduplicating);
        let unique = dedupe(&phones);
        stats.record_duplicates(unique.duplicates_removed);

        enter(tracker, JobState::Filtering);
        let split = partition(&phones, unique.retained.iter().copied(), &blocklist);
        stats.record_blocked(split.blocked.len());

        enter(tracker, JobState::Writing);
        let view = OutputView {
            table: &input.table,
            phone_column,
            phones: &phones,
            rows: &split.kept,
            strip_plus: request.options.strip_plus,
        };
        let artifact = self
            .writer
            .write(&id, &view, request.format, request.options.split_files)
            .map_err(PipelineError::WriteFailure)?;

        enter(tracker, JobState::Completed);
        let stats = stats.finish();
        debug_assert_eq!(stats.final_rows, split.kept.len());
        info!(
            job = %id,
            total_rows = stats.total_rows,
            final_rows = stats.final_rows,
            file = %artifact.file_name,
            "job completed"
        );
        Ok(JobOutcome {
            job_id: id,
            stats,
            artifact,
            input: input.info,
        })
    }

    fn spawn_fetch(&self) -> Result<JoinHandle<SourceResult<BlocklistSet>>> {
        let source = Arc::clone(&self.source);
        let normalizer = self.normalizer.clone();
        thread::Builder::new()
            .name("blocklist-fetch".to_string())
            .spawn(move || source.fetch(&normalizer))
            .map_err(|err| PipelineError::BlocklistUnavailable(SourceError::Io(err)))
    }

    fn prepare(&self, request: &JobRequest) -> Result<Prepared> {
        let input = read_table(&request.input).map_err(PipelineError::InputUnreadable)?;
        let phone_column = input
            .table
            .resolve_column(&request.options.phone_column)
            .map_err(PipelineError::ColumnNotFound)?;
        debug!(
            rows = input.table.len(),
            column = %input.table.headers[phone_column],
            "normalizing input"
        );
        let phones = normalize_column(&input.table, phone_column, &self.normalizer);
        Ok(Prepared {
            input,
            phone_column,
            phones,
        })
    }
}

fn enter(tracker: &mut JobTracker, to: JobState) {
    let moved = tracker.advance(to);
    debug_assert!(moved, "illegal job transition from {} to {to}", tracker.state());
}

/// Normalizes one column, in row order. Large tables are processed on the
/// rayon pool.
pub fn normalize_column(
    table: &Table,
    column: usize,
    normalizer: &PhoneNormalizer,
) -> Vec<PhoneValue> {
    let normalize = |row: &Row| normalizer.normalize(&row.get(column).as_text());
    if table.len() >= PARALLEL_THRESHOLD {
        table.rows.par_iter().map(normalize).collect()
    } else {
        table.rows.iter().map(normalize).collect()
    }
}
