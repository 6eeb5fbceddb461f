//! HTML report generator.
//!
//! Produces a single self-contained file with the CSS inlined: a batch
//! summary, a per-task table, and a per-student table.

use std::path::Path;

use anyhow::Result;

use crate::report::GradeReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a grade report as a self-contained HTML page.
pub fn generate_html(report: &GradeReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>alignmark report — {}</title>\n",
        html_escape(&report.template.file_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>alignmark report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Answer sheet: <strong>{}</strong> | {} tasks | {} submissions | {}</p>\n",
        html_escape(&report.template.file_name),
        report.template.task_count,
        report.stats.submissions,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Batch summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p>Mean score <strong>{:.2}</strong> of {} | {} extraction failure(s)</p>\n",
        report.stats.mean_score(),
        report.template.full_score,
        report.stats.extraction_failures,
    ));

    // Per-task table
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Task</th><th>Graded</th><th>Correct</th><th>Correct %</th><th>Manual</th><th>Skipped</th><th>Mean</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (task_id, stats) in &report.stats.per_task {
        let rate = if stats.graded == 0 {
            0.0
        } else {
            stats.correct as f64 / stats.graded as f64
        };
        let mean = if stats.graded == 0 {
            0.0
        } else {
            stats.score_sum / stats.graded as f64
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            html_escape(task_id),
            stats.graded,
            stats.correct,
            rate * 100.0,
            stats.manual,
            stats.skipped,
            mean,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-student table
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Submissions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>Student</th><th>File</th><th>Score</th><th>Status</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for s in &report.submissions {
        let (class, status) = match &s.error {
            Some(err) => ("fail", html_escape(err)),
            None => ("pass", "graded".to_string()),
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            html_escape(&s.student_id),
            html_escape(&s.file_name),
            s.total,
            status,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the HTML report to a file.
pub fn write_html_report(report: &GradeReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_html(report))?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem auto; max-width: 64rem; padding: 0 1rem; color: #1a1a1a; }
header h1 { margin-bottom: 0.25rem; }
.meta { color: #666; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; }
thead th { border-bottom: 2px solid #999; }
tr.fail td { background: #fdecea; }
tr.pass td:first-child { font-variant-numeric: tabular-nums; }
"#;
