//! jagdkurs CLI: exam sets and answer grading for the hunting-license course.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "jagdkurs",
    version,
    about = "Exam sets and answer grading for the hunting-license course"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SheetFormat {
    Json,
    Html,
}

#[derive(Subcommand)]
enum Commands {
    /// List subjects with bank statistics
    Subjects {
        /// Question bank JSON (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load the question bank and report problems
    Validate {
        /// Question bank JSON (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate one exam set
    Generate {
        /// Subject, or "Wildkrankheiten & Hunde" for the combined set
        #[arg(long)]
        subject: String,

        /// Draw a multiple-choice set from the subject's MC pool
        #[arg(long)]
        mc: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: SheetFormat,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Append the solutions to an HTML sheet
        #[arg(long)]
        answer_key: bool,

        /// RNG seed for reproducible sets
        #[arg(long)]
        seed: Option<u64>,

        /// Question bank JSON (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate one multiple-choice set per subject
    GenerateMcFull {
        /// Directory for the generated set files
        #[arg(long, default_value = "./jagdkurs-sets")]
        output_dir: PathBuf,

        /// RNG seed for reproducible sets
        #[arg(long)]
        seed: Option<u64>,

        /// Question bank JSON (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a free-text answer
    Evaluate {
        #[arg(long, default_value = "")]
        question: String,

        #[arg(long, default_value = "")]
        model_answer: String,

        #[arg(long, default_value = "")]
        user_answer: String,

        /// Additional accepted answer (repeatable)
        #[arg(long = "alt")]
        alternatives: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Answer a clarifying question about an exam question
    Followup {
        #[arg(long, default_value = "")]
        question: String,

        #[arg(long, default_value = "")]
        model_answer: String,

        #[arg(long)]
        user_answer: Option<String>,

        /// The learner's clarifying question
        #[arg(long, default_value = "")]
        followup: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report a questionable exam question
    Report {
        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "")]
        mode: String,

        #[arg(long, default_value = "")]
        question: String,

        #[arg(long, default_value = "")]
        answer: String,

        /// Alternative accepted answer (repeatable)
        #[arg(long = "alt")]
        alternatives: Vec<String>,

        #[arg(long, default_value = "")]
        reason: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jagdkurs=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Subjects { bank, config } => commands::subjects::execute(bank, config),
        Commands::Validate { bank, config } => commands::validate::execute(bank, config),
        Commands::Generate {
            subject,
            mc,
            format,
            output,
            answer_key,
            seed,
            bank,
            config,
        } => commands::generate::execute(
            subject, mc, format, output, answer_key, seed, bank, config,
        ),
        Commands::GenerateMcFull {
            output_dir,
            seed,
            bank,
            config,
        } => commands::generate_mc_full::execute(output_dir, seed, bank, config),
        Commands::Evaluate {
            question,
            model_answer,
            user_answer,
            alternatives,
            config,
        } => {
            commands::evaluate::execute(question, model_answer, user_answer, alternatives, config)
                .await
        }
        Commands::Followup {
            question,
            model_answer,
            user_answer,
            followup,
            config,
        } => {
            commands::followup::execute(question, model_answer, user_answer, followup, config)
                .await
        }
        Commands::Report {
            subject,
            mode,
            question,
            answer,
            alternatives,
            reason,
            config,
        } => {
            commands::report::execute(
                subject,
                mode,
                question,
                answer,
                alternatives,
                reason,
                config,
            )
            .await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
