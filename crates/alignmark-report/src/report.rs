//! Grade report model with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use alignmark_core::model::SubmissionReport;
use alignmark_core::statistics::BatchStats;

/// A complete grading run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Summary of the answer sheet graded against.
    pub template: TemplateSummary,
    /// Per-submission results, sorted by student id.
    pub submissions: Vec<SubmissionReport>,
    /// Merged batch statistics.
    pub stats: BatchStats,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an answer sheet (without its full text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Source file name of the answer sheet.
    pub file_name: String,
    pub task_count: usize,
    /// Sum of all task scores.
    pub full_score: f64,
}

impl GradeReport {
    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alignmark_core::model::{OutcomeStatus, TaskOutcome};

    fn sample_report() -> GradeReport {
        let submission = SubmissionReport {
            student_id: "2023010101".into(),
            file_name: "2023010101_alice.txt".into(),
            total: 2.0,
            log: "Task:1  ok".into(),
            outcomes: vec![TaskOutcome {
                task_id: "1".into(),
                answer_text: "42".into(),
                image_count: 0,
                awarded: 2.0,
                status: OutcomeStatus::Correct,
                detail: None,
            }],
            error: None,
        };
        let mut stats = BatchStats::default();
        stats.record(&submission);
        GradeReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            template: TemplateSummary {
                file_name: "answer.txt".into(),
                task_count: 1,
                full_score: 2.0,
            },
            submissions: vec![submission],
            stats,
            duration_ms: 12,
        }
    }

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradeReport::load_json(&path).unwrap();

        assert_eq!(loaded.template.task_count, 1);
        assert_eq!(loaded.submissions.len(), 1);
        assert_eq!(loaded.stats.submissions, 1);
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = GradeReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(format!("{err:#}").contains("report.json"));
    }
}
