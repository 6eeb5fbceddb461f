//! The `alignmark inspect` command: align one submission and show what each
//! task would receive, without scoring it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use alignmark_core::align::{align, ScoringScheme};
use alignmark_core::segment::segment;
use alignmark_core::template::parse_template;
use alignmark_extract::{build_submission, source_for};

pub fn execute(answer_path: PathBuf, submission_path: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&answer_path)
        .with_context(|| format!("failed to read answer sheet: {}", answer_path.display()))?;
    let template = parse_template(&text)?;

    let source = source_for(&submission_path).with_context(|| {
        format!(
            "no document source for this format: {}",
            submission_path.display()
        )
    })?;
    let submission = build_submission(source, &submission_path, 0)?;

    let query: Vec<char> = submission.text.chars().collect();
    let target: Vec<char> = template.literal.chars().collect();
    let alignment = align(&query, &target, &ScoringScheme::default());
    let segments = segment(&alignment, &template.boundaries)?;

    println!("Submission: {}", submission.file_name);
    println!("Alignment score: {}", alignment.score);
    for (task, seg) in template.tasks.iter().zip(&segments) {
        let images = if seg.image_indices.is_empty() {
            String::new()
        } else {
            format!("  [{} image(s)]", seg.image_indices.len())
        };
        println!("  Task {}: {:?}{images}", task.id, seg.text);
    }

    Ok(())
}
