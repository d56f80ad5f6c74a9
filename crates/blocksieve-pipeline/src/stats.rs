use blocksieve_core::ProcessingStats;
use std::time::Instant;

/// Collects counters as the stages run; `finish` derives the final row count
/// so the reported numbers always add up.
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    stats: ProcessingStats,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            stats: ProcessingStats::default(),
        }
    }

    pub fn record_input(&mut self, total_rows: usize, valid_numbers: usize) {
        self.stats.total_rows = total_rows;
        self.stats.valid_numbers = valid_numbers;
    }

    pub fn record_blocklist(&mut self, distinct_entries: usize) {
        self.stats.blocklist_size = distinct_entries;
    }

    pub fn record_duplicates(&mut self, removed: usize) {
        self.stats.duplicates_removed = removed;
    }

    pub fn record_blocked(&mut self, blocked: usize) {
        self.stats.blocked_numbers = blocked;
    }

    pub fn finish(self) -> ProcessingStats {
        let mut stats = self.stats;
        stats.final_rows = stats
            .total_rows
            .saturating_sub(stats.blocked_numbers)
            .saturating_sub(stats.duplicates_removed);
        stats.processing_time_seconds = self.started.elapsed().as_secs_f64();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::StatsAggregator;

    #[test]
    fn final_rows_follow_the_counters() {
        let mut stats = StatsAggregator::new();
        stats.record_input(10, 8);
        stats.record_blocklist(3);
        stats.record_duplicates(2);
        stats.record_blocked(1);

        let stats = stats.finish();
        assert_eq!(stats.final_rows, 7);
        assert_eq!(stats.invalid_numbers(), 2);
        assert!(stats.is_consistent());
        assert!(stats.processing_time_seconds >= 0.0);
    }
}
