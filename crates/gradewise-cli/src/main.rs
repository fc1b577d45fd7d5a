//! gradewise CLI: grade text submissions and estimate plagiarism risk.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gradewise",
    version,
    about = "Rubric scoring and plagiarism-risk estimation for text submissions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single submission
    Evaluate {
        /// File holding the submission text
        #[arg(long)]
        content: PathBuf,

        /// File holding the assignment description
        #[arg(long)]
        description: PathBuf,

        /// Peer submission file, or a directory of .txt/.md files (repeatable)
        #[arg(long)]
        peers: Vec<PathBuf>,

        /// Score ceiling (default: from config)
        #[arg(long)]
        max_score: Option<u32>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade every submission of an assignment set
    Run {
        /// Path to .toml assignment set or directory
        #[arg(long)]
        assignment_set: PathBuf,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Max concurrent evaluations (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Peers to compare against: prior, all (default: from config)
        #[arg(long)]
        peer_scope: Option<String>,

        /// Flag submissions at or above this risk percentage (default: from config)
        #[arg(long)]
        risk_threshold: Option<u32>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate assignment set TOML files
    Validate {
        /// Path to assignment set file or directory
        #[arg(long)]
        assignment_set: PathBuf,
    },

    /// Create starter config and example assignment set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradewise=info".parse().expect("valid tracing directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            content,
            description,
            peers,
            max_score,
            format,
            config,
        } => commands::evaluate::execute(content, description, peers, max_score, format, config),
        Commands::Run {
            assignment_set,
            output,
            format,
            parallelism,
            peer_scope,
            risk_threshold,
            config,
        } => {
            commands::run::execute(
                assignment_set,
                output,
                format,
                parallelism,
                peer_scope,
                risk_threshold,
                config,
            )
            .await
        }
        Commands::Validate { assignment_set } => commands::validate::execute(assignment_set),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
