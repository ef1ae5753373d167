//! Study Worker CLI
//!
//! Runs the polling worker that turns uploaded PDFs into study content
//! (summary, flashcards, quizzes), plus a small status command for
//! monitoring the queue.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use study_worker::db::{create_pool_from_env, documents, PgStudyStore};
use study_worker::generator::DEFAULT_MODEL;
use study_worker::{
    setup_signal_handler, DocumentProcessor, GeminiClient, HttpContentFetcher, WorkerConfig,
    WorkerRunner,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "study-worker")]
#[command(about = "Generate study content (flashcards, quizzes, summaries) from uploaded PDFs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as worker, polling the documents table for pending uploads
    Worker {
        /// Poll interval in seconds (default: 5)
        #[arg(short, long, default_value = "5")]
        poll_interval: u64,

        /// Per-document timeout in seconds (default: 300)
        #[arg(short, long, default_value = "300")]
        timeout: u64,

        /// Gemini model to use
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Poll once and exit (for testing)
        #[arg(long)]
        once: bool,
    },

    /// Show how many documents are waiting to be processed
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load .env file if present
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Worker {
            poll_interval,
            timeout,
            model,
            once,
        } => {
            info!("Initializing worker...");

            // Create database pool
            let pool = create_pool_from_env().await?;
            info!("Database connection established");

            // Build worker config
            let config = WorkerConfig::builder()
                .poll_interval_secs(poll_interval)
                .document_timeout(Duration::from_secs(timeout))
                .model(&model)
                .build();

            let api_key = std::env::var("GEMINI_API_KEY")
                .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY not set"))?;

            // Wire up the pipeline clients
            let store = Arc::new(PgStudyStore::new(pool));
            let fetcher = Arc::new(HttpContentFetcher::new()?);
            let generator = Arc::new(GeminiClient::new(&api_key, &config.model)?);

            let processor = DocumentProcessor::new(fetcher, generator, store.clone());
            let runner = WorkerRunner::new(store, config, processor);

            if once {
                // Run once mode
                let processed = runner.run_once().await?;
                if processed == 0 {
                    println!("No pending documents found");
                } else {
                    println!("Handled {} document(s)", processed);
                }
            } else {
                // Setup graceful shutdown
                let shutdown = runner.shutdown_handle();
                setup_signal_handler(shutdown);

                // Run continuous worker loop
                runner.run().await?;
            }
        }

        Commands::Status => {
            let pool = create_pool_from_env().await?;
            let pending = documents::count_processing(&pool).await?;
            println!("Documents awaiting processing: {}", pending);
        }
    }

    Ok(())
}
