//! Worker runner - main polling loop

use crate::db::store::StudyStore;
use crate::error::Result;
use crate::worker::{DocumentProcessor, WorkerConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};
use tracing::{error, info};

/// Worker that polls the documents table and processes each pending
/// document sequentially
pub struct WorkerRunner {
    store: Arc<dyn StudyStore>,
    config: WorkerConfig,
    processor: DocumentProcessor,
    shutdown: Arc<AtomicBool>,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        store: Arc<dyn StudyStore>,
        config: WorkerConfig,
        processor: DocumentProcessor,
    ) -> Self {
        Self {
            store,
            config,
            processor,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a handle to signal shutdown
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Main worker loop
    ///
    /// Polls for pending documents and processes them until shutdown is
    /// signaled. An empty poll sleeps for the configured interval.
    pub async fn run(&self) -> Result<()> {
        info!("Starting study worker...");
        info!("Poll interval: {:?}", self.config.poll_interval);
        info!("Document timeout: {:?}", self.config.document_timeout);
        info!("Model: {}", self.config.model);

        loop {
            // Check for shutdown signal
            if self.shutdown.load(Ordering::Relaxed) {
                info!("Shutdown signal received, stopping worker...");
                break;
            }

            match self.poll_once().await {
                Ok(0) => {
                    sleep(self.config.poll_interval).await;
                }
                Ok(n) => {
                    info!("Batch of {} document(s) handled, checking for more...", n);
                }
                Err(e) => {
                    error!("Worker error: {}", e);
                    // Wait a bit before retrying after a poll-level error
                    sleep(Duration::from_secs(10)).await;
                }
            }
        }

        info!("Worker stopped");
        Ok(())
    }

    /// Query the processing batch and run each document sequentially
    ///
    /// A failure in one document is logged, flips that document to `error`,
    /// and never aborts the batch. Returns the number of documents picked
    /// up by this poll.
    pub async fn poll_once(&self) -> Result<usize> {
        let documents = self.store.fetch_processing_documents().await?;
        if documents.is_empty() {
            return Ok(0);
        }

        let count = documents.len();
        info!("Found {} document(s) awaiting processing", count);

        for doc in &documents {
            // Finish the current document on shutdown, skip the rest
            if self.shutdown.load(Ordering::Relaxed) {
                info!("Shutdown signaled mid-batch, leaving remaining documents");
                break;
            }

            let outcome = timeout(self.config.document_timeout, self.processor.process(doc)).await;

            match outcome {
                Ok(Ok(())) => {
                    info!("Document {} ({}) completed", doc.id, doc.title);
                }
                Ok(Err(e)) => {
                    error!("Document {} ({}) failed: {}", doc.id, doc.title, e);
                    self.store.mark_error(doc.id).await?;
                }
                Err(_) => {
                    error!(
                        "Document {} ({}) timed out after {:?}",
                        doc.id, doc.title, self.config.document_timeout
                    );
                    self.store.mark_error(doc.id).await?;
                }
            }
        }

        Ok(count)
    }

    /// Run a single poll and exit (for testing with --once)
    pub async fn run_once(&self) -> Result<usize> {
        info!("Running worker in single-poll mode...");
        self.poll_once().await
    }
}

/// Setup signal handlers for graceful shutdown
pub fn setup_signal_handler(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating shutdown...");
                shutdown.store(true, Ordering::Relaxed);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });
}
