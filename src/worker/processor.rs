//! Per-document pipeline: fetch, extract, generate, persist

use std::sync::Arc;
use tracing::info;

use crate::db::models::StudyDocument;
use crate::db::store::StudyStore;
use crate::error::Result;
use crate::extractor;
use crate::fetcher::ContentFetcher;
use crate::generator::StudyGenerator;
use crate::persister::ResultPersister;

/// Runs the full pipeline for a single document
///
/// Clients are injected so the pipeline can be driven end to end with test
/// doubles. Any stage failure aborts this document only; the caller decides
/// how to record it.
pub struct DocumentProcessor {
    fetcher: Arc<dyn ContentFetcher>,
    generator: Arc<dyn StudyGenerator>,
    persister: ResultPersister,
}

impl DocumentProcessor {
    /// Create a new processor over the given clients
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        generator: Arc<dyn StudyGenerator>,
        store: Arc<dyn StudyStore>,
    ) -> Self {
        Self {
            fetcher,
            generator,
            persister: ResultPersister::new(store),
        }
    }

    /// Process a single document: download its PDF, extract text, generate
    /// study content, and persist the results
    pub async fn process(&self, doc: &StudyDocument) -> Result<()> {
        info!("Processing document: {} ({})", doc.title, doc.id);

        let bytes = self.fetcher.fetch(&doc.file_url).await?;

        let text = extractor::extract_text(&bytes)?;
        info!("Extracted {} chars from: {}", text.len(), doc.title);

        let result = self.generator.generate(&text).await?;
        info!(
            "Generated {} flashcards, {} quizzes for: {}",
            result.flashcards.len(),
            result.quizzes.len(),
            doc.title
        );

        self.persister.persist(doc.id, &result).await?;

        Ok(())
    }
}
