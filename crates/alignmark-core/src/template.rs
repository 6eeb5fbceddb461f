//! Answer-sheet template parsing.
//!
//! The answer sheet is plain text carrying task markers of the form
//! `$>:id|answer|score[|FLAG...]<:$`. Splitting the sheet on markers yields
//! the literal template text the submissions are aligned against, the
//! boundary offset where each marker sat, and the ordered task list.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;
use crate::model::{AnswerSpec, Task};

fn task_marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\$>:(.*?)<:\$").expect("marker pattern is valid"))
}

/// A parsed answer sheet: literal text, boundaries, and tasks.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    /// Template text with the marker spans removed.
    pub literal: String,
    /// Cumulative literal length (in symbols) at each removed marker, one
    /// per task, non-decreasing.
    pub boundaries: Vec<usize>,
    /// Tasks in document order.
    pub tasks: Vec<Task>,
}

impl ParsedTemplate {
    /// Sum of all task scores.
    pub fn full_score(&self) -> f64 {
        self.tasks.iter().map(|t| t.score).sum()
    }
}

/// Parse an answer sheet into its template, boundaries, and tasks.
pub fn parse_template(text: &str) -> Result<ParsedTemplate, CoreError> {
    let mut literal = String::new();
    let mut literal_symbols = 0usize;
    let mut boundaries = Vec::new();
    let mut tasks = Vec::new();
    let mut last = 0usize;

    for caps in task_marker_regex().captures_iter(text) {
        let span = caps.get(0).expect("regex match has a full capture");
        let segment = &text[last..span.start()];
        literal.push_str(segment);
        literal_symbols += segment.chars().count();
        boundaries.push(literal_symbols);
        tasks.push(parse_task_marker(&caps[1])?);
        last = span.end();
    }
    literal.push_str(&text[last..]);

    Ok(ParsedTemplate {
        literal,
        boundaries,
        tasks,
    })
}

/// Parse the body of one task marker: `id|answer|score[|FLAG...]`.
///
/// Flags: `REGEX`, `MANUAL`, `SUB`, and `JUMP <target>` (consumes the next
/// field). Unrecognized flags are ignored.
fn parse_task_marker(body: &str) -> Result<Task, CoreError> {
    let fields: Vec<&str> = body.split('|').collect();
    if fields.len() < 3 {
        return Err(CoreError::malformed(
            body,
            "expected at least id|answer|score",
        ));
    }
    let id = fields[0].trim().to_string();
    if id.is_empty() {
        return Err(CoreError::malformed(body, "task id is empty"));
    }
    let score: f64 = fields[2]
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidScore {
            task: id.clone(),
            value: fields[2].trim().to_string(),
        })?;

    let mut task = Task {
        id,
        answer: AnswerSpec::parse(fields[1]),
        score,
        regex: false,
        manual: false,
        sub: false,
        jump_to: None,
    };

    let mut rest = fields[3..].iter();
    while let Some(flag) = rest.next() {
        match flag.trim() {
            "REGEX" => task.regex = true,
            "MANUAL" => task.manual = true,
            "SUB" => task.sub = true,
            "JUMP" => match rest.next() {
                Some(target) => task.jump_to = Some(target.trim().to_string()),
                None => return Err(CoreError::malformed(body, "JUMP flag without a target")),
            },
            _ => {}
        }
    }
    Ok(task)
}

/// A finding from template validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The task id, when the finding concerns one task.
    pub task_id: Option<String>,
    pub message: String,
}

/// Validate a parsed template for common authoring mistakes.
pub fn validate_template(template: &ParsedTemplate) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for task in &template.tasks {
        if !seen.insert(task.id.as_str()) {
            warnings.push(ValidationWarning {
                task_id: Some(task.id.clone()),
                message: format!("duplicate task id: {}", task.id),
            });
        }
    }

    let ids: HashSet<&str> = template.tasks.iter().map(|t| t.id.as_str()).collect();
    for task in &template.tasks {
        if let Some(target) = &task.jump_to {
            if !ids.contains(target.as_str()) {
                warnings.push(ValidationWarning {
                    task_id: Some(task.id.clone()),
                    message: format!("jump target '{target}' does not exist"),
                });
            }
        }
    }

    for task in &template.tasks {
        if !task.manual && answer_is_empty(&task.answer) {
            warnings.push(ValidationWarning {
                task_id: Some(task.id.clone()),
                message: "answer is empty but the task is not MANUAL".into(),
            });
        }
        if task.score <= 0.0 {
            warnings.push(ValidationWarning {
                task_id: Some(task.id.clone()),
                message: format!("score {} is not positive", task.score),
            });
        }
    }

    warnings
}

fn answer_is_empty(spec: &AnswerSpec) -> bool {
    match spec {
        AnswerSpec::Literal(text) | AnswerSpec::Scored(text, _) => text.trim().is_empty(),
        AnswerSpec::Alternatives(alts) => alts.iter().all(answer_is_empty),
    }
}
