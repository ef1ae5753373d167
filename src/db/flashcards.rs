//! Flashcards table operations

use crate::db::models::NewFlashcard;
use crate::db::DbPool;
use crate::error::Result;

/// Insert a single generated flashcard
///
/// There is no dedup key: re-processing a document inserts duplicate rows.
pub async fn insert_flashcard(pool: &DbPool, card: &NewFlashcard) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO flashcards (document_id, front_text, back_text, mastery_level)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(card.document_id)
    .bind(&card.front_text)
    .bind(&card.back_text)
    .bind(card.mastery_level)
    .execute(pool)
    .await?;

    Ok(())
}
