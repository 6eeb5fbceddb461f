//! Submission discovery and filename checks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// List submission files in a directory, sorted by file name.
///
/// Only regular files are returned; nested directories are not descended
/// into (the submissions folder is flat).
pub fn scan_submissions(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Count files per extension, most common first.
pub fn extension_census(files: &[PathBuf]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        let ext = file
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        *counts.entry(ext).or_default() += 1;
    }
    let mut census: Vec<(String, usize)> = counts.into_iter().collect();
    census.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    census
}

/// Derive the student id from a submission filename.
///
/// The id is the stem prefix before the first `_` and must be exactly
/// `digits` ASCII digits; anything else is rejected so misnamed files
/// surface before grading starts.
pub fn student_id_from_path(path: &Path, digits: usize) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let id = stem.split('_').next()?;
    if id.len() == digits && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id.to_string())
    } else {
        None
    }
}
