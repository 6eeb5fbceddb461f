//! Core data model types for alignmark.
//!
//! These are the fundamental types the whole pipeline uses to represent
//! tasks, submissions, and grading outcomes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A gradable answer slot parsed out of the answer sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: String,
    /// Expected answer(s).
    pub answer: AnswerSpec,
    /// Full score awarded for a correct answer.
    pub score: f64,
    /// Match the answer as a regular expression instead of literal text.
    #[serde(default)]
    pub regex: bool,
    /// Queue for human review instead of automatic matching.
    #[serde(default)]
    pub manual: bool,
    /// This task is a sub-question of another task.
    #[serde(default)]
    pub sub: bool,
    /// Skip this task when the referenced task already earned full marks.
    #[serde(default)]
    pub jump_to: Option<String>,
}

/// Expected answer for a task.
///
/// Evaluation is first-match-wins: alternatives are tried in order and the
/// first one that matches decides the awarded score. The short-circuit order
/// is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSpec {
    /// Accept this text at the task's full score.
    Literal(String),
    /// Accept this text at a specific score.
    Scored(String, f64),
    /// The first matching alternative wins.
    Alternatives(Vec<AnswerSpec>),
}

impl AnswerSpec {
    /// Parse the answer field of a task marker.
    ///
    /// Alternatives are separated by `;;`; an alternative may carry its own
    /// score as a `=score` suffix. Text whose suffix does not parse as a
    /// number is taken literally, `=` included.
    pub fn parse(field: &str) -> AnswerSpec {
        let mut alts: Vec<AnswerSpec> = field.split(";;").map(Self::parse_one).collect();
        if alts.len() == 1 {
            alts.remove(0)
        } else {
            AnswerSpec::Alternatives(alts)
        }
    }

    fn parse_one(piece: &str) -> AnswerSpec {
        let piece = piece.trim();
        if let Some((text, score)) = piece.rsplit_once('=') {
            if let Ok(score) = score.trim().parse::<f64>() {
                return AnswerSpec::Scored(text.trim().to_string(), score);
            }
        }
        AnswerSpec::Literal(piece.to_string())
    }

    /// Evaluate `given` against this spec; returns the awarded score of the
    /// first matching alternative, or `None` when nothing matches.
    pub fn evaluate(
        &self,
        given: &str,
        full_score: f64,
        matches: &dyn Fn(&str, &str) -> bool,
    ) -> Option<f64> {
        match self {
            AnswerSpec::Literal(expect) => matches(given, expect).then_some(full_score),
            AnswerSpec::Scored(expect, score) => matches(given, expect).then_some(*score),
            AnswerSpec::Alternatives(alts) => alts
                .iter()
                .find_map(|alt| alt.evaluate(given, full_score, matches)),
        }
    }
}

/// An image embedded in a submission document.
///
/// The extraction side owns decoding; here images are opaque bytes plus the
/// numeric id from the source media filename that establishes their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionImage {
    pub ordinal: u32,
    pub data: Vec<u8>,
}

/// One student's extracted submission, ready for alignment.
#[derive(Debug, Clone)]
pub struct Submission {
    pub student_id: String,
    pub file_name: String,
    /// Body text with image sentinels already rewritten to `<img:i>` markers.
    pub text: String,
    /// Images in document order.
    pub images: Vec<Arc<SubmissionImage>>,
}

/// A task's recovered answer: the carved text plus its embedded images.
#[derive(Debug, Clone)]
pub struct TaskAnswer {
    pub text: String,
    pub images: Vec<Arc<SubmissionImage>>,
}

/// How a single task of a single submission was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Full marks.
    Correct,
    /// A scored alternative or judge awarded less than full marks.
    Partial,
    /// No alternative matched.
    Wrong,
    /// Queued for human review.
    Manual,
    /// Skipped because the jump target already earned full marks.
    Skipped,
}

/// What happened to one task of one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: String,
    /// The carved answer text shown in logs (image markers replaced).
    pub answer_text: String,
    /// Number of images re-associated with this task.
    pub image_count: usize,
    pub awarded: f64,
    pub status: OutcomeStatus,
    /// Extra detail, e.g. a judge's log line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The graded result for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub student_id: String,
    pub file_name: String,
    pub total: f64,
    /// Human-readable per-task report with aligned columns.
    pub log: String,
    pub outcomes: Vec<TaskOutcome>,
    /// Set when extraction failed and the submission could not be graded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionReport {
    /// Zero-score report for a submission that could not be extracted.
    /// Extraction failures never abort a batch.
    pub fn extraction_failure(student_id: &str, file_name: &str, error: &str) -> Self {
        SubmissionReport {
            student_id: student_id.to_string(),
            file_name: file_name.to_string(),
            total: 0.0,
            log: format!("Could not extract document: {file_name}"),
            outcomes: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}
