//! Per-task scoring strategies and log assembly.
//!
//! A task resolves through, in order: the jump skip (sub-questions whose
//! main question already earned full marks), a registered judge, the manual
//! queue, and finally literal or regex matching of the answer spec.

use regex::Regex;

use crate::model::{OutcomeStatus, Task, TaskAnswer, TaskOutcome};
use crate::traits::Judge;

const SCORE_EPSILON: f64 = 1e-9;

/// Score one task given its carved answer and the outcomes of earlier tasks.
pub fn score_task(
    task: &Task,
    answer: &TaskAnswer,
    judge: Option<&dyn Judge>,
    earlier: &[TaskOutcome],
) -> TaskOutcome {
    if let Some(target) = &task.jump_to {
        let target_full = earlier
            .iter()
            .any(|o| o.task_id == *target && o.status == OutcomeStatus::Correct);
        if target_full {
            return outcome(task, answer, 0.0, OutcomeStatus::Skipped, None);
        }
    }

    if let Some(judge) = judge {
        return match judge.run(&task.id, &answer.text) {
            Ok(verdict) => {
                let status = status_for(verdict.score, task.score);
                outcome(task, answer, verdict.score, status, Some(verdict.log))
            }
            Err(err) => {
                tracing::warn!(task = %task.id, error = %err, "judge failed");
                outcome(
                    task,
                    answer,
                    0.0,
                    OutcomeStatus::Wrong,
                    Some(format!("judge failed: {err}")),
                )
            }
        };
    }

    if task.manual {
        return outcome(task, answer, 0.0, OutcomeStatus::Manual, None);
    }

    let awarded = if task.regex {
        task.answer
            .evaluate(&answer.text, task.score, &regex_matches)
    } else {
        task.answer
            .evaluate(&answer.text, task.score, &literal_matches)
    };

    match awarded {
        Some(score) => {
            let status = status_for(score, task.score);
            outcome(task, answer, score, status, None)
        }
        None => outcome(task, answer, 0.0, OutcomeStatus::Wrong, None),
    }
}

fn outcome(
    task: &Task,
    answer: &TaskAnswer,
    awarded: f64,
    status: OutcomeStatus,
    detail: Option<String>,
) -> TaskOutcome {
    TaskOutcome {
        task_id: task.id.clone(),
        answer_text: answer.text.clone(),
        image_count: answer.images.len(),
        awarded,
        status,
        detail,
    }
}

fn status_for(awarded: f64, full: f64) -> OutcomeStatus {
    if (awarded - full).abs() < SCORE_EPSILON {
        OutcomeStatus::Correct
    } else if awarded.abs() < SCORE_EPSILON {
        OutcomeStatus::Wrong
    } else {
        OutcomeStatus::Partial
    }
}

/// Case-insensitive comparison of trimmed answers.
fn literal_matches(given: &str, expect: &str) -> bool {
    given.trim().to_lowercase() == expect.trim().to_lowercase()
}

/// Full-match of `given` against the expected pattern.
fn regex_matches(given: &str, expect: &str) -> bool {
    match Regex::new(&format!("^(?:{expect})$")) {
        Ok(re) => re.is_match(given.trim()),
        Err(err) => {
            tracing::warn!(pattern = %expect, error = %err, "invalid answer pattern");
            false
        }
    }
}

/// Assemble the per-submission log from its task outcomes.
///
/// One tab-separated line per task; columns are aligned afterwards with
/// [`format_columns`].
pub fn render_log(outcomes: &[TaskOutcome], total: f64) -> String {
    let mut log = String::from("Report generated by the alignmark marking pipeline\n");
    for o in outcomes {
        let verdict = match o.status {
            OutcomeStatus::Correct => format!("√  +{}", o.awarded),
            OutcomeStatus::Partial => format!("~  +{}", o.awarded),
            OutcomeStatus::Wrong => "×".to_string(),
            OutcomeStatus::Manual => "manual review".to_string(),
            OutcomeStatus::Skipped => "skipped".to_string(),
        };
        log.push_str(&format!(
            "  Task:{}\tAnswer:{:?}\t{}\n",
            o.task_id, o.answer_text, verdict
        ));
        if let Some(detail) = &o.detail {
            log.push_str(&format!("  \t{detail}\n"));
        }
    }
    log.push_str(&format!("Total Score: {total}\n"));
    format_columns(&log, 2)
}

/// Align the `\t`-separated columns of a multi-line string.
///
/// Each pass finds the furthest first tab across lines and pads every line's
/// first tab out to it, keeping at least `blank` spaces between columns.
pub fn format_columns(s: &str, blank: usize) -> String {
    let mut lines: Vec<String> = s.split('\n').map(str::to_string).collect();
    loop {
        let Some(widest) = lines
            .iter()
            .filter_map(|l| l.chars().position(|c| c == '\t'))
            .max()
        else {
            return lines.join("\n");
        };
        for line in &mut lines {
            if let Some(x) = line.chars().position(|c| c == '\t') {
                let head: String = line.chars().take(x).collect();
                let tail: String = line.chars().skip(x + 1).collect();
                let pad = " ".repeat(blank + widest - x);
                *line = format!("{head}{pad}{tail}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerSpec;
    use crate::traits::Verdict;

    fn task(id: &str, answer: &str, score: f64) -> Task {
        Task {
            id: id.into(),
            answer: AnswerSpec::parse(answer),
            score,
            regex: false,
            manual: false,
            sub: false,
            jump_to: None,
        }
    }

    fn given(text: &str) -> TaskAnswer {
        TaskAnswer {
            text: text.into(),
            images: Vec::new(),
        }
    }

    #[test]
    fn literal_match_is_case_insensitive() {
        let outcome = score_task(&task("1", "Alice", 2.0), &given("alice"), None, &[]);
        assert_eq!(outcome.status, OutcomeStatus::Correct);
        assert_eq!(outcome.awarded, 2.0);
    }

    #[test]
    fn wrong_answer_scores_zero() {
        let outcome = score_task(&task("1", "Alice", 2.0), &given("Bob"), None, &[]);
        assert_eq!(outcome.status, OutcomeStatus::Wrong);
        assert_eq!(outcome.awarded, 0.0);
    }

    #[test]
    fn scored_alternative_is_partial() {
        let outcome = score_task(&task("1", "blue;;teal=0.5", 2.0), &given("teal"), None, &[]);
        assert_eq!(outcome.status, OutcomeStatus::Partial);
        assert_eq!(outcome.awarded, 0.5);
    }

    #[test]
    fn regex_task_full_matches() {
        let mut t = task("1", r"\d+", 2.0);
        t.regex = true;
        assert_eq!(
            score_task(&t, &given("123"), None, &[]).status,
            OutcomeStatus::Correct
        );
        assert_eq!(
            score_task(&t, &given("123x"), None, &[]).status,
            OutcomeStatus::Wrong
        );
    }

    #[test]
    fn invalid_pattern_never_matches() {
        let mut t = task("1", r"(unclosed", 2.0);
        t.regex = true;
        assert_eq!(
            score_task(&t, &given("(unclosed"), None, &[]).status,
            OutcomeStatus::Wrong
        );
    }

    #[test]
    fn manual_task_is_queued() {
        let mut t = task("1", "", 2.0);
        t.manual = true;
        let outcome = score_task(&t, &given("an essay"), None, &[]);
        assert_eq!(outcome.status, OutcomeStatus::Manual);
        assert_eq!(outcome.awarded, 0.0);
    }

    #[test]
    fn jump_skips_when_target_has_full_marks() {
        let mut t = task("1b", "detail", 1.0);
        t.jump_to = Some("1".into());
        let earlier = vec![TaskOutcome {
            task_id: "1".into(),
            answer_text: "ok".into(),
            image_count: 0,
            awarded: 2.0,
            status: OutcomeStatus::Correct,
            detail: None,
        }];
        let outcome = score_task(&t, &given("detail"), None, &earlier);
        assert_eq!(outcome.status, OutcomeStatus::Skipped);
        assert_eq!(outcome.awarded, 0.0);
    }

    #[test]
    fn jump_runs_normally_when_target_missed_marks() {
        let mut t = task("1b", "detail", 1.0);
        t.jump_to = Some("1".into());
        let earlier = vec![TaskOutcome {
            task_id: "1".into(),
            answer_text: "no".into(),
            image_count: 0,
            awarded: 0.0,
            status: OutcomeStatus::Wrong,
            detail: None,
        }];
        let outcome = score_task(&t, &given("detail"), None, &earlier);
        assert_eq!(outcome.status, OutcomeStatus::Correct);
    }

    struct EvenJudge;

    impl Judge for EvenJudge {
        fn run(&self, _task_id: &str, text: &str) -> anyhow::Result<Verdict> {
            let n: i64 = text.trim().parse()?;
            if n > 0 && n % 2 == 0 {
                Ok(Verdict {
                    score: 5.0,
                    log: "√".into(),
                })
            } else {
                Ok(Verdict {
                    score: 0.0,
                    log: "×".into(),
                })
            }
        }
    }

    #[test]
    fn judge_overrides_matching() {
        let t = task("9", "whatever", 5.0);
        let outcome = score_task(&t, &given("4"), Some(&EvenJudge), &[]);
        assert_eq!(outcome.status, OutcomeStatus::Correct);
        assert_eq!(outcome.awarded, 5.0);
        assert_eq!(outcome.detail.as_deref(), Some("√"));
    }

    #[test]
    fn judge_error_scores_zero() {
        let t = task("9", "whatever", 5.0);
        let outcome = score_task(&t, &given("not a number"), Some(&EvenJudge), &[]);
        assert_eq!(outcome.status, OutcomeStatus::Wrong);
        assert!(outcome.detail.as_deref().unwrap().contains("judge failed"));
    }

    #[test]
    fn columns_line_up() {
        let formatted = format_columns("a\nb\tccc\td\neee\tf\tg", 2);
        assert_eq!(formatted, "a\nb    ccc  d\neee  f    g");
    }

    #[test]
    fn log_contains_verdicts_and_total() {
        let outcomes = vec![
            TaskOutcome {
                task_id: "1".into(),
                answer_text: "42".into(),
                image_count: 0,
                awarded: 2.0,
                status: OutcomeStatus::Correct,
                detail: None,
            },
            TaskOutcome {
                task_id: "2".into(),
                answer_text: "nope".into(),
                image_count: 0,
                awarded: 0.0,
                status: OutcomeStatus::Wrong,
                detail: None,
            },
        ];
        let log = render_log(&outcomes, 2.0);
        assert!(log.contains("Task:1"));
        assert!(log.contains('√'));
        assert!(log.contains('×'));
        assert!(log.contains("Total Score: 2"));
        assert!(!log.contains('\t'), "tabs should be expanded");
    }
}
