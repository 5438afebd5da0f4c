//! quizrun CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizrun",
    version,
    about = "Randomized quizzes from local or remote question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a test
    Take {
        /// Draw questions from this file or directory instead of the saved bank
        #[arg(long, conflicts_with = "code")]
        bank: Option<PathBuf>,

        /// Load the quiz published under this code
        #[arg(long)]
        code: Option<String>,

        /// Only questions of this subject
        #[arg(long)]
        subject: Option<String>,

        /// Only questions of this grade level
        #[arg(long)]
        grade: Option<String>,

        /// Only questions with this identifier
        #[arg(long)]
        identifier: Option<String>,

        /// Number of questions (default: from config)
        #[arg(long)]
        length: Option<usize>,

        /// Write a JSON report here when the test ends
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Add questions to the saved bank
    Import {
        /// Question file or directory
        #[arg(long, required_unless_present = "code", conflicts_with = "code")]
        path: Option<PathBuf>,

        /// Import the quiz published under this code
        #[arg(long)]
        code: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show or clear the saved question bank
    Bank {
        /// Delete every saved question
        #[arg(long)]
        clear: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question files
    Validate {
        /// Question file or directory
        #[arg(long)]
        path: PathBuf,
    },

    /// Show or reset stars and badges
    Progress {
        /// Zero the star count and drop all badges
        #[arg(long)]
        reset: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrun=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            code,
            subject,
            grade,
            identifier,
            length,
            output,
            config,
        } => {
            let source = commands::take::PoolSource::from_args(bank, code);
            let filter = quizrun_core::bank::QuestionFilter {
                subject,
                grade_level: grade,
                identifier,
            };
            commands::take::execute(source, filter, length, output, config).await
        }
        Commands::Import { path, code, config } => {
            commands::import::execute(path, code, config).await
        }
        Commands::Bank { clear, config } => commands::bank::execute(clear, config),
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Progress { reset, config } => commands::progress::execute(reset, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
