//! Tutorius CLI — the main entry point.
//!
//! Commands:
//! - `chat`      — Send one message to the guide or a subject tutor
//! - `recommend` — Print study recommendations for a student
//! - `seed`      — Load a demo dataset into the progress store

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tutorius",
    about = "Tutorius — AI tutoring engine for Lithuanian students",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message to the tutor
    Chat {
        /// Student identifier
        #[arg(short, long)]
        user: String,

        /// Operating mode: "guide" (default) or "tutor"
        #[arg(short, long)]
        mode: Option<String>,

        /// Subject name for tutor mode (e.g., "Fizika")
        #[arg(short, long)]
        subject: Option<String>,

        /// Subject row ID for grade resolution and history scoping
        #[arg(long)]
        subject_id: Option<String>,

        /// Current topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Grade level override
        #[arg(short, long)]
        grade: Option<u8>,

        /// The message to send
        message: String,
    },

    /// Print study recommendations for a student
    Recommend {
        /// Student identifier
        #[arg(short, long)]
        user: String,

        /// Restrict recommendations to one subject
        #[arg(long)]
        subject_id: Option<String>,

        /// Emit the recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a demo dataset into the progress store
    Seed {
        /// Student identifier to seed data for
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat {
            user,
            mode,
            subject,
            subject_id,
            topic,
            grade,
            message,
        } => {
            commands::chat::run(commands::chat::ChatArgs {
                user,
                mode,
                subject,
                subject_id,
                topic,
                grade,
                message,
            })
            .await?
        }
        Commands::Recommend {
            user,
            subject_id,
            json,
        } => commands::recommend::run(&user, subject_id.as_deref(), json).await?,
        Commands::Seed { user } => commands::seed::run(&user).await?,
    }

    Ok(())
}
