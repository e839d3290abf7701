//! services/digest/src/bin/digest.rs

use std::path::PathBuf;
use std::sync::Arc;

use book_digest_core::digest::DigestOrchestrator;
use book_digest_core::domain::BookRef;
use clap::{Parser, Subcommand};
use digest_lib::{config::Config, error::DigestError, selector};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "digest", about = "Generate daily book digests and title suggestions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the daily digest for a reading list given as a JSON file.
    Send {
        /// Path to a JSON array of {"title", "author", "description"?} entries.
        #[arg(long)]
        books: PathBuf,

        /// Cap on how many books are drawn from the list.
        #[arg(long)]
        max_books: Option<usize>,
    },

    /// Suggest book details for a partial title.
    Suggest {
        /// At least 3 characters after trimming.
        partial_title: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), DigestError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded.");

    // --- 2. Resolve Providers ---
    let providers = selector::resolve(&config);

    // --- 3. Run the Requested Command ---
    let cli = Cli::parse();
    match cli.command {
        Command::Send { books, max_books } => {
            let raw = std::fs::read_to_string(&books)?;
            let books: Vec<BookRef> = serde_json::from_str(&raw)?;

            let orchestrator = DigestOrchestrator::new(Arc::clone(&providers.primary));
            let result = orchestrator.generate_daily_quotes(&books, max_books).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Suggest { partial_title } => {
            let suggestions = providers.primary.get_book_info(&partial_title).await?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
    }

    Ok(())
}
