//! alignmark CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "alignmark", version, about = "Answer-sheet alignment and auto-grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a folder of submissions against an answer sheet
    Grade {
        /// Working folder containing the answer sheet and a data/ directory
        #[arg(long)]
        workdir: PathBuf,

        /// Answer sheet path (default: <workdir>/answer.txt)
        #[arg(long)]
        answer: Option<PathBuf>,

        /// Worker threads (default from config; 0 = one per core)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output format: json, html, all
        #[arg(long, default_value = "all")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate an answer sheet's task markers
    Validate {
        /// Answer sheet path
        #[arg(long)]
        answer: PathBuf,
    },

    /// Align a single submission and show the carved answers
    Inspect {
        /// Answer sheet path
        #[arg(long)]
        answer: PathBuf,

        /// Submission file path
        #[arg(long)]
        submission: PathBuf,
    },

    /// Create a starter workdir with config and example answer sheet
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alignmark=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            workdir,
            answer,
            parallelism,
            format,
            config,
        } => commands::grade::execute(workdir, answer, parallelism, format, config),
        Commands::Validate { answer } => commands::validate::execute(answer),
        Commands::Inspect { answer, submission } => {
            commands::inspect::execute(answer, submission)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
