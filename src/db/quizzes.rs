//! Quizzes table operations

use crate::db::models::NewQuizItem;
use crate::db::DbPool;
use crate::error::Result;

/// Insert a single generated quiz question
///
/// Options are stored as a JSONB array in row order.
pub async fn insert_quiz_item(pool: &DbPool, item: &NewQuizItem) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quizzes (document_id, question_text, options, correct_answer_index, explanation)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(item.document_id)
    .bind(&item.question_text)
    .bind(sqlx::types::Json(&item.options))
    .bind(item.correct_answer_index)
    .bind(&item.explanation)
    .execute(pool)
    .await?;

    Ok(())
}
