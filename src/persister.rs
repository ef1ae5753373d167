//! Persists generated study content and flips the document status

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{NewFlashcard, NewQuizItem, BASELINE_MASTERY};
use crate::db::store::StudyStore;
use crate::error::Result;
use crate::generator::GenerationResult;

/// Writes flashcards and quizzes as individual rows, then marks the
/// document ready.
///
/// Write order is flashcards, quizzes, status flip; the status flip is the
/// commit signal. The inserts are not transactional and there is no dedup
/// key, so re-running for the same document duplicates rows. A crash
/// mid-sequence can leave draft rows under a document never marked ready.
pub struct ResultPersister {
    store: Arc<dyn StudyStore>,
}

impl ResultPersister {
    pub fn new(store: Arc<dyn StudyStore>) -> Self {
        Self { store }
    }

    /// Persist one generation result for the given document
    pub async fn persist(&self, document_id: Uuid, result: &GenerationResult) -> Result<()> {
        info!(
            "Saving {} flashcards for document {}",
            result.flashcards.len(),
            document_id
        );
        for draft in &result.flashcards {
            self.store
                .insert_flashcard(&NewFlashcard {
                    document_id,
                    front_text: draft.front.clone(),
                    back_text: draft.back.clone(),
                    mastery_level: BASELINE_MASTERY,
                })
                .await?;
        }

        info!(
            "Saving {} quizzes for document {}",
            result.quizzes.len(),
            document_id
        );
        for draft in &result.quizzes {
            self.store
                .insert_quiz_item(&NewQuizItem {
                    document_id,
                    question_text: draft.question.clone(),
                    options: draft.options.clone(),
                    correct_answer_index: draft.correct_index as i32,
                    explanation: draft.explanation.clone(),
                })
                .await?;
        }

        self.store.mark_ready(document_id, &result.summary).await?;
        info!("Document {} marked ready", document_id);

        Ok(())
    }
}
