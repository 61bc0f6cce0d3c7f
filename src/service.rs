//! Document service
//!
//! The one real component of this server: validates, stores, catalogs,
//! retrieves, and removes documents, coordinating the storage directory
//! and the metadata table. Every operation is a one-shot call with no
//! retries; partial failure between disk and database is accepted and
//! left in place.

use sqlx::SqlitePool;

use crate::config::StorageConfig;
use crate::db::{Document, DocumentRepository};
use crate::error::{AppError, Result};
use crate::storage::{sanitize_file_name, unique_disk_name, StorageDir};

pub struct DocumentService {
    store: StorageDir,
    db: SqlitePool,
    allowed_extensions: Vec<String>,
}

impl DocumentService {
    pub fn new(storage: &StorageConfig, db: SqlitePool) -> Self {
        Self {
            store: StorageDir::new(storage.upload_dir.clone()),
            db,
            allowed_extensions: storage.allowed_extensions.clone(),
        }
    }

    pub fn store(&self) -> &StorageDir {
        &self.store
    }

    /// Store an uploaded file and record its metadata.
    ///
    /// The disk write happens before the row insert; if the insert fails
    /// the file stays behind as an orphan (no rollback).
    pub async fn upload(&self, data: &[u8], original_name: &str) -> Result<Document> {
        if original_name.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        if !self.has_allowed_extension(original_name) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed extensions: {}",
                self.allowed_extensions.join(", ")
            )));
        }

        let filename = sanitize_file_name(original_name);
        if filename.is_empty() {
            return Err(AppError::Validation(
                "File name is empty after sanitization".to_string(),
            ));
        }

        let disk_name = unique_disk_name(&filename);
        let size = self.store.save(&disk_name, data).await?;

        let document = DocumentRepository::new(&self.db)
            .insert(&filename, &disk_name, size as i64)
            .await?;

        tracing::info!(
            id = document.id,
            filename = %document.filename,
            size = document.filesize,
            "Document uploaded"
        );

        Ok(document)
    }

    /// List all documents, most recent first
    pub async fn list(&self) -> Result<Vec<Document>> {
        DocumentRepository::new(&self.db).list().await
    }

    /// Load a document's bytes along with its display file name
    pub async fn fetch_for_download(&self, id: i64) -> Result<(Vec<u8>, String)> {
        let document = DocumentRepository::new(&self.db)
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

        // A row whose file is missing surfaces here as an IO error
        let bytes = self.store.read(&document.filepath).await?;

        Ok((bytes, document.filename))
    }

    /// Delete a document: row first, then best-effort disk removal
    pub async fn delete(&self, id: i64) -> Result<()> {
        let repo = DocumentRepository::new(&self.db);

        let document = repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

        repo.delete(id).await?;

        if let Err(e) = self.store.remove(&document.filepath).await {
            tracing::warn!(
                filepath = %document.filepath,
                "Failed to remove stored file: {}",
                e
            );
        }

        tracing::info!(id = id, filename = %document.filename, "Document deleted");

        Ok(())
    }

    fn has_allowed_extension(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
