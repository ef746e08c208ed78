//! Case document metadata.

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Document;
use crate::validation::{optional, require, MAX_TITLE_LENGTH};

/// Title used when an upload has none.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Upload form input. `file_path` points into external storage.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub title: Option<String>,
    pub file_path: String,
}

/// Attach a document to a case.
pub async fn create_document(
    pool: &SqlitePool,
    case_id: i64,
    input: &DocumentInput,
) -> Result<Document> {
    let title = optional("title", input.title.as_deref(), MAX_TITLE_LENGTH)?
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let file_path = require("file_path", &input.file_path, 1024)?;

    let document = sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (title, case_id, file_path)
        VALUES (?, ?, ?)
        RETURNING id, title, case_id, file_path, uploaded_at
        "#,
    )
    .bind(&title)
    .bind(case_id)
    .bind(&file_path)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            DatabaseError::not_found("Case", case_id)
        }
        other => DatabaseError::Sqlx(other),
    })?;

    tracing::info!(document_id = document.id, case_id, "Document uploaded");
    Ok(document)
}

/// List a case's documents, oldest first.
pub async fn list_documents(pool: &SqlitePool, case_id: i64) -> Result<Vec<Document>> {
    let documents = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, case_id, file_path, uploaded_at
        FROM documents
        WHERE case_id = ?
        ORDER BY uploaded_at, id
        "#,
    )
    .bind(case_id)
    .fetch_all(pool)
    .await?;

    Ok(documents)
}
