//! Per-student log files.
//!
//! Each submission's log is written under a name derived from the SHA-256 of
//! its content, so identical logs dedupe and names leak nothing about the
//! student.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use alignmark_core::model::SubmissionReport;

/// Write every submission's log under `dir`; returns `(student_id, path)`
/// pairs in input order.
pub fn write_student_logs(
    reports: &[SubmissionReport],
    dir: &Path,
) -> Result<Vec<(String, PathBuf)>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        let digest: [u8; 32] = Sha256::digest(report.log.as_bytes()).into();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        let path = dir.join(format!("{hex}.txt"));
        std::fs::write(&path, &report.log)
            .with_context(|| format!("failed to write log {}", path.display()))?;
        written.push((report.student_id.clone(), path));
    }
    Ok(written)
}
