use blocksieve_core::JobId;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Lifecycle of one job. Stages run strictly in declaration order; `Failed`
/// is reachable from any stage that has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    FetchingBlocklist,
    Normalizing,
    Deduplicating,
    Filtering,
    Writing,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::FetchingBlocklist => "fetching_blocklist",
            JobState::Normalizing => "normalizing",
            JobState::Deduplicating => "deduplicating",
            JobState::Filtering => "filtering",
            JobState::Writing => "writing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// The stage that follows this one on success.
    pub fn next(self) -> Option<JobState> {
        match self {
            JobState::Idle => Some(JobState::FetchingBlocklist),
            JobState::FetchingBlocklist => Some(JobState::Normalizing),
            JobState::Normalizing => Some(JobState::Deduplicating),
            JobState::Deduplicating => Some(JobState::Filtering),
            JobState::Filtering => Some(JobState::Writing),
            JobState::Writing => Some(JobState::Completed),
            JobState::Completed | JobState::Failed => None,
        }
    }

    pub fn can_transition_to(self, to: JobState) -> bool {
        if to == JobState::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct JobTracker {
    id: JobId,
    state: JobState,
}

impl JobTracker {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Idle,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Moves to the next stage. Returns false, leaving the state unchanged,
    /// when `to` does not directly follow the current stage.
    #[must_use]
    pub fn advance(&mut self, to: JobState) -> bool {
        if to == JobState::Failed || !self.state.can_transition_to(to) {
            return false;
        }
        debug!(job = %self.id, from = %self.state, to = %to, "job transition");
        self.state = to;
        true
    }

    pub fn fail(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        debug!(job = %self.id, stage = %self.state, "job failed");
        self.state = JobState::Failed;
    }
}
