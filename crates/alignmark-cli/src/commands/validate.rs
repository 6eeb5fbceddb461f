//! The `alignmark validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use alignmark_core::template::{parse_template, validate_template};

pub fn execute(answer_path: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&answer_path)
        .with_context(|| format!("failed to read answer sheet: {}", answer_path.display()))?;
    let template = parse_template(&text)?;

    println!(
        "Answer sheet: {} ({} tasks, full score {})",
        answer_path.display(),
        template.tasks.len(),
        template.full_score()
    );

    let warnings = validate_template(&template);
    for w in &warnings {
        let prefix = w
            .task_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Answer sheet valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
