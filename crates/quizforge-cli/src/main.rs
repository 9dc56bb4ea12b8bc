//! quizforge CLI: build, check and grade quiz definition files.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Quiz definition builder and rubric tester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an example quiz
    Init {
        /// Where to write the example quiz
        #[arg(long, default_value = "quiz.json")]
        output: PathBuf,
    },

    /// Check a quiz file for export errors and warnings
    Validate {
        /// Quiz JSON file
        #[arg(long)]
        input: PathBuf,
    },

    /// Validate a quiz and write it as <APP_ID>_v<VERSION>.json
    Export {
        /// Quiz JSON file
        #[arg(long)]
        input: PathBuf,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a sample answer against one question's rubric
    Grade {
        /// Quiz JSON file
        #[arg(long)]
        input: PathBuf,

        /// Assessment ID
        #[arg(long)]
        assessment: String,

        /// Question ID
        #[arg(long)]
        question: String,

        /// Sample answer text
        #[arg(long)]
        answer: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the assessments and questions in a quiz
    List {
        /// Quiz JSON file
        #[arg(long)]
        input: PathBuf,
    },

    /// Manage the saved working draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,

        /// Config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Store a quiz file as the current draft
    Save {
        /// Quiz JSON file
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the current draft (or the starter quiz if none)
    Restore {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Forget the draft and its saved view state
    Clear,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { output } => commands::init::execute(output),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Export {
            input,
            output_dir,
            config,
        } => commands::export::execute(input, output_dir, config),
        Commands::Grade {
            input,
            assessment,
            question,
            answer,
            format,
        } => commands::grade::execute(input, assessment, question, answer, format),
        Commands::List { input } => commands::list::execute(input),
        Commands::Draft { action, config } => match action {
            DraftAction::Save { input } => commands::draft::save(input, config),
            DraftAction::Restore { output } => commands::draft::restore(output, config),
            DraftAction::Clear => commands::draft::clear(config),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
