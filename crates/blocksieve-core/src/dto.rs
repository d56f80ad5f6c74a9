use serde::{Deserialize, Serialize};

/// Counters reported for a completed job.
///
/// `final_rows == total_rows - blocked_numbers - duplicates_removed` always
/// holds for stats produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_rows: usize,
    pub valid_numbers: usize,
    pub blocked_numbers: usize,
    pub final_rows: usize,
    pub blocklist_size: usize,
    pub duplicates_removed: usize,
    pub processing_time_seconds: f64,
}

impl ProcessingStats {
    pub fn invalid_numbers(&self) -> usize {
        self.total_rows.saturating_sub(self.valid_numbers)
    }

    pub fn is_consistent(&self) -> bool {
        self.blocked_numbers + self.duplicates_removed <= self.total_rows
            && self.final_rows == self.total_rows - self.blocked_numbers - self.duplicates_removed
            && self.valid_numbers <= self.total_rows
    }
}
