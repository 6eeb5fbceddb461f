//! Batch aggregation over submission reports.
//!
//! Statistics are an explicit value produced per submission and merged by
//! the caller — never process-wide mutable state — so independent grading
//! calls can run on any thread and fold their results afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{OutcomeStatus, SubmissionReport};

/// Aggregate statistics for a batch of submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub submissions: usize,
    pub extraction_failures: usize,
    pub score_sum: f64,
    /// Per-task tallies, keyed by task id (ordered for stable reports).
    pub per_task: BTreeMap<String, TaskStats>,
}

/// Tallies for a single task across the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub graded: usize,
    pub correct: usize,
    pub manual: usize,
    pub skipped: usize,
    pub score_sum: f64,
}

impl BatchStats {
    /// Fold one submission's report into this value.
    pub fn record(&mut self, report: &SubmissionReport) {
        self.submissions += 1;
        self.score_sum += report.total;
        if report.error.is_some() {
            self.extraction_failures += 1;
        }
        for outcome in &report.outcomes {
            let task = self.per_task.entry(outcome.task_id.clone()).or_default();
            task.graded += 1;
            task.score_sum += outcome.awarded;
            match outcome.status {
                OutcomeStatus::Correct => task.correct += 1,
                OutcomeStatus::Manual => task.manual += 1,
                OutcomeStatus::Skipped => task.skipped += 1,
                OutcomeStatus::Partial | OutcomeStatus::Wrong => {}
            }
        }
    }

    /// Merge two independently accumulated values.
    pub fn merge(mut self, other: BatchStats) -> BatchStats {
        self.submissions += other.submissions;
        self.extraction_failures += other.extraction_failures;
        self.score_sum += other.score_sum;
        for (id, stats) in other.per_task {
            let task = self.per_task.entry(id).or_default();
            task.graded += stats.graded;
            task.correct += stats.correct;
            task.manual += stats.manual;
            task.skipped += stats.skipped;
            task.score_sum += stats.score_sum;
        }
        self
    }

    /// Mean total score across the batch, 0 when empty.
    pub fn mean_score(&self) -> f64 {
        if self.submissions == 0 {
            0.0
        } else {
            self.score_sum / self.submissions as f64
        }
    }
}
