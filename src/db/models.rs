//! Database models matching the documents/flashcards/quizzes schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Mastery level assigned to every freshly generated flashcard
pub const BASELINE_MASTERY: i32 = 1;

/// StudyDocument - Matches documents table
///
/// Created externally in `processing` status once intake is complete;
/// this worker only reads it and flips it to `ready` or `error`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudyDocument {
    pub id: Uuid,
    pub title: String,
    pub file_url: String,
    pub status: String,
    pub summary_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    PendingIntake,
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::PendingIntake => "pending_intake",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Error => "error",
        }
    }
}

/// NewFlashcard - For inserting generated flashcards
#[derive(Debug, Clone, Serialize)]
pub struct NewFlashcard {
    pub document_id: Uuid,
    pub front_text: String,
    pub back_text: String,
    pub mastery_level: i32,
}

/// NewQuizItem - For inserting generated quiz questions
#[derive(Debug, Clone, Serialize)]
pub struct NewQuizItem {
    pub document_id: Uuid,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i32,
    pub explanation: String,
}
