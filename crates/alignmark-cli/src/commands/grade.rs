//! The `alignmark grade` command.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use alignmark_core::engine::{EngineConfig, GradingEngine};
use alignmark_core::model::SubmissionReport;
use alignmark_core::template::{parse_template, validate_template};
use alignmark_extract::{
    build_submission, extension_census, scan_submissions, source_for, student_id_from_path,
};
use alignmark_report::{write_html_report, write_student_logs, GradeReport, TemplateSummary};

use crate::config::load_config;

pub fn execute(
    workdir: PathBuf,
    answer: Option<PathBuf>,
    parallelism: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(workdir.is_dir(), "workdir not found: {}", workdir.display());
    let data_dir = workdir.join("data");
    anyhow::ensure!(
        data_dir.is_dir(),
        "submissions directory not found: {}",
        data_dir.display()
    );

    let config = load_config(config_path.as_deref(), &workdir)?;
    let parallelism = parallelism.unwrap_or(config.parallelism);

    // Parse and sanity-check the answer sheet.
    let answer_path = answer.unwrap_or_else(|| workdir.join("answer.txt"));
    let answer_text = std::fs::read_to_string(&answer_path)
        .with_context(|| format!("failed to read answer sheet: {}", answer_path.display()))?;
    let template = parse_template(&answer_text)?;
    anyhow::ensure!(
        !template.tasks.is_empty(),
        "answer sheet has no task markers: {}",
        answer_path.display()
    );
    for w in validate_template(&template) {
        let prefix = w.task_id.map(|id| format!("[{id}] ")).unwrap_or_default();
        eprintln!("  {prefix}WARNING: {}", w.message);
    }

    // Discover submissions.
    let files = scan_submissions(&data_dir)?;
    eprintln!("Found {} files in the submissions folder.", files.len());
    for (ext, count) in extension_census(&files) {
        eprintln!("  .{ext}: {count}");
    }

    // Misnamed files abort the run before any grading happens.
    let misnamed: Vec<String> = files
        .iter()
        .filter(|f| student_id_from_path(f, config.student_id_digits).is_none())
        .map(|f| f.file_name().unwrap_or_default().to_string_lossy().into_owned())
        .collect();
    if !misnamed.is_empty() {
        anyhow::bail!(
            "refusing to grade: {} file(s) without a {}-digit student id prefix: {}",
            misnamed.len(),
            config.student_id_digits,
            misnamed.join(", ")
        );
    }

    let start = Instant::now();

    // Extract. Failures become zero-score reports, not run failures.
    let mut submissions = Vec::new();
    let mut failed: Vec<SubmissionReport> = Vec::new();
    for file in &files {
        let file_name = file
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let student_id = student_id_from_path(file, config.student_id_digits)
            .expect("misnamed files were rejected above");
        match source_for(file) {
            Some(source) => match build_submission(source, file, config.student_id_digits) {
                Ok(submission) => submissions.push(submission),
                Err(err) => {
                    tracing::warn!(file = %file_name, error = %err, "extraction failed");
                    failed.push(SubmissionReport::extraction_failure(
                        &student_id,
                        &file_name,
                        &format!("{err:#}"),
                    ));
                }
            },
            None => failed.push(SubmissionReport::extraction_failure(
                &student_id,
                &file_name,
                "no document source for this format",
            )),
        }
    }

    let summary = TemplateSummary {
        file_name: answer_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned(),
        task_count: template.tasks.len(),
        full_score: template.full_score(),
    };

    let engine = GradingEngine::new(
        template,
        HashMap::new(),
        EngineConfig {
            scheme: config.scoring,
            parallelism,
        },
    );

    eprintln!(
        "\nGrading {} submission(s) against {} task(s)...",
        submissions.len() + failed.len(),
        summary.task_count
    );
    let (reports, stats) = engine.grade_batch(&submissions, failed)?;
    let elapsed = start.elapsed();

    for r in &reports {
        let note = if r.error.is_some() { " (extraction failed)" } else { "" };
        eprintln!("  {}  {}{}", r.student_id, r.total, note);
    }

    print_summary(&stats, summary.full_score);
    eprintln!(
        "Complete: {} submission(s), {} extraction failure(s) ({:.1}s)",
        stats.submissions,
        stats.extraction_failures,
        elapsed.as_secs_f64()
    );

    // Save outputs.
    let result_dir = workdir.join("result");
    std::fs::create_dir_all(&result_dir)?;
    let report = GradeReport {
        id: uuid::Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        template: summary,
        submissions: reports,
        stats,
        duration_ms: elapsed.as_millis() as u64,
    };

    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = result_dir.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = result_dir.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    let logs = write_student_logs(&report.submissions, &result_dir.join("log"))?;
    eprintln!("Wrote {} student log(s) to: {}", logs.len(), result_dir.join("log").display());

    Ok(())
}

fn print_summary(stats: &alignmark_core::statistics::BatchStats, full_score: f64) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Task", "Graded", "Correct", "Correct %", "Manual", "Mean"]);

    for (task_id, task) in &stats.per_task {
        let rate = if task.graded == 0 {
            0.0
        } else {
            task.correct as f64 / task.graded as f64
        };
        let mean = if task.graded == 0 {
            0.0
        } else {
            task.score_sum / task.graded as f64
        };
        table.add_row(vec![
            Cell::new(task_id),
            Cell::new(task.graded),
            Cell::new(task.correct),
            Cell::new(format!("{:.1}%", rate * 100.0)),
            Cell::new(task.manual),
            Cell::new(format!("{mean:.2}")),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!("Mean total: {:.2} of {}", stats.mean_score(), full_score);
}
