//! Record-store abstraction used by the processing pipeline
//!
//! The pipeline only needs four query shapes: select the processing batch,
//! insert flashcards, insert quizzes, and flip a document's status. Putting
//! them behind a trait lets tests drive the worker with an in-memory double.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{NewFlashcard, NewQuizItem, StudyDocument};
use crate::db::{documents, flashcards, quizzes, DbPool};
use crate::error::Result;

#[async_trait]
pub trait StudyStore: Send + Sync {
    /// All documents currently in `processing` status, oldest first
    async fn fetch_processing_documents(&self) -> Result<Vec<StudyDocument>>;

    async fn insert_flashcard(&self, card: &NewFlashcard) -> Result<()>;

    async fn insert_quiz_item(&self, item: &NewQuizItem) -> Result<()>;

    /// Flip the document to `ready` and set its summary
    async fn mark_ready(&self, document_id: Uuid, summary: &str) -> Result<()>;

    /// Flip the document to `error`
    async fn mark_error(&self, document_id: Uuid) -> Result<()>;
}

/// Postgres-backed store
pub struct PgStudyStore {
    pool: DbPool,
}

impl PgStudyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudyStore for PgStudyStore {
    async fn fetch_processing_documents(&self) -> Result<Vec<StudyDocument>> {
        documents::fetch_processing(&self.pool).await
    }

    async fn insert_flashcard(&self, card: &NewFlashcard) -> Result<()> {
        flashcards::insert_flashcard(&self.pool, card).await
    }

    async fn insert_quiz_item(&self, item: &NewQuizItem) -> Result<()> {
        quizzes::insert_quiz_item(&self.pool, item).await
    }

    async fn mark_ready(&self, document_id: Uuid, summary: &str) -> Result<()> {
        documents::mark_ready(&self.pool, document_id, summary).await
    }

    async fn mark_error(&self, document_id: Uuid) -> Result<()> {
        documents::mark_error(&self.pool, document_id).await
    }
}
