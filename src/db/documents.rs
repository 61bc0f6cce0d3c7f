//! Document metadata database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Document metadata record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: i64,
    /// Original (sanitized) file name, display-only
    pub filename: String,
    /// Generated unique on-disk name
    pub filepath: String,
    /// Size in bytes, measured at upload time
    pub filesize: i64,
    pub created_at: String,
}

/// Document repository
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a document by id
    pub async fn get(&self, id: i64) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, filepath, filesize, created_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    /// List all documents, most recent first
    pub async fn list(&self) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, filepath, filesize, created_at
            FROM documents
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Insert a new document row and return it with its assigned id
    pub async fn insert(&self, filename: &str, filepath: &str, filesize: i64) -> Result<Document> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (filename, filepath, filesize, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(filename)
        .bind(filepath)
        .bind(filesize)
        .bind(&now)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created document".to_string()))
    }

    /// Delete a document row, returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // Single connection so the in-memory database is shared
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);

        let first = repo.insert("a.pdf", "tok1_a.pdf", 10).await.unwrap();
        let second = repo.insert("b.pdf", "tok2_b.pdf", 20).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.filename, "a.pdf");
        assert_eq!(second.filesize, 20);
    }

    #[tokio::test]
    async fn list_returns_most_recent_first() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);

        repo.insert("old.pdf", "tok1_old.pdf", 1).await.unwrap();
        let newest = repo.insert("new.pdf", "tok2_new.pdf", 2).await.unwrap();

        let documents = repo.list().await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, newest.id);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);

        let doc = repo.insert("a.pdf", "tok_a.pdf", 5).await.unwrap();
        assert!(repo.delete(doc.id).await.unwrap());
        assert!(!repo.delete(doc.id).await.unwrap());
        assert!(repo.get(doc.id).await.unwrap().is_none());
    }
}
