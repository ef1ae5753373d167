//! Documents table operations

use crate::db::models::{DocumentStatus, StudyDocument};
use crate::db::DbPool;
use crate::error::Result;
use sqlx::Row;
use uuid::Uuid;

/// Fetch all documents awaiting AI processing
///
/// Order is oldest-first so long-waiting uploads are handled before new ones.
pub async fn fetch_processing(pool: &DbPool) -> Result<Vec<StudyDocument>> {
    let documents = sqlx::query_as::<_, StudyDocument>(
        r#"
        SELECT * FROM documents
        WHERE status = 'processing'
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(documents)
}

/// Mark a document ready and set its summary
///
/// This is the commit signal: consumers must not treat the document as
/// usable until this update lands.
pub async fn mark_ready(pool: &DbPool, document_id: Uuid, summary: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE documents
        SET status = $2,
            summary_text = $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(document_id)
    .bind(DocumentStatus::Ready.as_str())
    .bind(summary)
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a document as failed
///
/// A document stays in `error` until externally reset to `processing`.
pub async fn mark_error(pool: &DbPool, document_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE documents
        SET status = $2,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(document_id)
    .bind(DocumentStatus::Error.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Count documents awaiting processing, for monitoring
pub async fn count_processing(pool: &DbPool) -> Result<i64> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count FROM documents
        WHERE status = 'processing'
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}

#[cfg(test)]
mod tests {
    // Integration tests require a database - see tests/ directory
}
