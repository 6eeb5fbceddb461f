//! The `alignmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create alignmark.toml
    if std::path::Path::new("alignmark.toml").exists() {
        println!("alignmark.toml already exists, skipping.");
    } else {
        std::fs::write("alignmark.toml", SAMPLE_CONFIG)?;
        println!("Created alignmark.toml");
    }

    // Create example answer sheet
    if std::path::Path::new("answer.txt").exists() {
        println!("answer.txt already exists, skipping.");
    } else {
        std::fs::write("answer.txt", EXAMPLE_ANSWER_SHEET)?;
        println!("Created answer.txt");
    }

    // Create the submissions folder with one sample submission
    std::fs::create_dir_all("data")?;
    let sample_path = std::path::Path::new("data/0000000000_sample.txt");
    if sample_path.exists() {
        println!("data/0000000000_sample.txt already exists, skipping.");
    } else {
        std::fs::write(sample_path, EXAMPLE_SUBMISSION)?;
        println!("Created data/0000000000_sample.txt");
    }

    println!("\nNext steps:");
    println!("  1. Edit answer.txt with your tasks");
    println!("  2. Run: alignmark validate --answer answer.txt");
    println!("  3. Drop submissions into data/ and run: alignmark grade --workdir .");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# alignmark configuration

# Worker threads for batch grading; 0 = one per core.
parallelism = 0

# Required digit count of student ids in submission filenames
# (e.g. 2023010101_name.txt).
student_id_digits = 10

# Alignment scoring constants.
[scoring]
match_reward = 3
mismatch_penalty = -1
gap_open = -2
gap_extend = -1
"#;

const EXAMPLE_ANSWER_SHEET: &str = r#"Computer Science Foundation — Homework 1

1. The capital of France is $>:1|Paris|2<:$.
2. 6 x 7 = $>:2|42|2<:$.
3. Name any primary color: $>:3|red;;green;;blue|1<:$.
4. A student id matches the pattern $>:4|\d{10}|2|REGEX<:$.
5. Paste a screenshot of your terminal: $>:5||3|MANUAL<:$.
"#;

const EXAMPLE_SUBMISSION: &str = r#"Computer Science Foundation — Homework 1

1. The capital of France is Paris.
2. 6 x 7 = 42.
3. Name any primary color: blue.
4. A student id matches the pattern 2023010101.
5. Paste a screenshot of your terminal: see attachment.
"#;
