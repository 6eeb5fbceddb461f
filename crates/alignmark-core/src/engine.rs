//! Batch grading engine.
//!
//! One submission is the unit of parallelism: grading is a pure function of
//! the parsed template and the submission, so a batch fans out across a
//! rayon pool with no shared mutable state and folds its statistics
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::align::{align, ScoringScheme};
use crate::model::{Submission, SubmissionReport, TaskAnswer};
use crate::scoring::{render_log, score_task};
use crate::segment::segment;
use crate::statistics::BatchStats;
use crate::template::ParsedTemplate;
use crate::traits::Judge;

/// Configuration for the grading engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Alignment scoring constants.
    pub scheme: ScoringScheme,
    /// Worker threads for batch grading; 0 uses the global rayon pool.
    pub parallelism: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scheme: ScoringScheme::default(),
            parallelism: 0,
        }
    }
}

/// The grading engine: a parsed template, scoring constants, and any
/// registered judges.
pub struct GradingEngine {
    template: ParsedTemplate,
    template_symbols: Vec<char>,
    judges: HashMap<String, Arc<dyn Judge>>,
    config: EngineConfig,
}

impl GradingEngine {
    pub fn new(
        template: ParsedTemplate,
        judges: HashMap<String, Arc<dyn Judge>>,
        config: EngineConfig,
    ) -> Self {
        let template_symbols = template.literal.chars().collect();
        Self {
            template,
            template_symbols,
            judges,
            config,
        }
    }

    /// The template this engine grades against.
    pub fn template(&self) -> &ParsedTemplate {
        &self.template
    }

    /// Grade one submission: align, carve, score, render the log.
    pub fn grade(&self, submission: &Submission) -> Result<SubmissionReport> {
        let query: Vec<char> = submission.text.chars().collect();
        let alignment = align(&query, &self.template_symbols, &self.config.scheme);
        let segments = segment(&alignment, &self.template.boundaries)
            .context("template boundaries do not fit its literal text")?;

        let marker_total: usize = segments.iter().map(|s| s.image_indices.len()).sum();
        if marker_total != submission.images.len() {
            tracing::warn!(
                student = %submission.student_id,
                markers = marker_total,
                images = submission.images.len(),
                "image marker count does not match extracted image count"
            );
        }

        let mut outcomes = Vec::with_capacity(self.template.tasks.len());
        for (task, seg) in self.template.tasks.iter().zip(&segments) {
            let images = seg
                .image_indices
                .iter()
                .filter_map(|&idx| {
                    let image = submission.images.get(idx).cloned();
                    if image.is_none() {
                        tracing::warn!(
                            student = %submission.student_id,
                            index = idx,
                            "image marker refers past the image list"
                        );
                    }
                    image
                })
                .collect();
            let answer = TaskAnswer {
                text: seg.text.clone(),
                images,
            };
            let judge = self.judges.get(&task.id).map(|j| j.as_ref());
            let outcome = score_task(task, &answer, judge, &outcomes);
            outcomes.push(outcome);
        }

        let total = outcomes.iter().map(|o| o.awarded).sum();
        let log = render_log(&outcomes, total);
        tracing::debug!(student = %submission.student_id, total, "graded");

        Ok(SubmissionReport {
            student_id: submission.student_id.clone(),
            file_name: submission.file_name.clone(),
            total,
            log,
            outcomes,
            error: None,
        })
    }

    /// Grade a batch in parallel and fold the statistics.
    ///
    /// `pre_failed` carries reports for submissions that never reached the
    /// engine (extraction failures); they join the result and the stats.
    pub fn grade_batch(
        &self,
        submissions: &[Submission],
        pre_failed: Vec<SubmissionReport>,
    ) -> Result<(Vec<SubmissionReport>, BatchStats)> {
        let mut reports = if self.config.parallelism > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.parallelism)
                .build()
                .context("failed to build grading thread pool")?;
            pool.install(|| self.grade_all(submissions))?
        } else {
            self.grade_all(submissions)?
        };

        reports.extend(pre_failed);
        reports.sort_by(|a, b| a.student_id.cmp(&b.student_id));

        let stats = reports
            .par_iter()
            .fold(BatchStats::default, |mut acc, report| {
                acc.record(report);
                acc
            })
            .reduce(BatchStats::default, BatchStats::merge);

        Ok((reports, stats))
    }

    fn grade_all(&self, submissions: &[Submission]) -> Result<Vec<SubmissionReport>> {
        submissions
            .par_iter()
            .map(|submission| self.grade(submission))
            .collect()
    }
}
