//! Local filesystem storage for uploaded documents
//!
//! Files live flat under a single directory, each one named with a
//! random hex token prepended to the sanitized original name.

use std::io;
use std::path::PathBuf;

use uuid::Uuid;

/// The directory holding uploaded file bytes
#[derive(Debug, Clone)]
pub struct StorageDir {
    base: PathBuf,
}

impl StorageDir {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_exists(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.base).await
    }

    fn full_path(&self, disk_name: &str) -> PathBuf {
        self.base.join(disk_name)
    }

    /// Write file bytes and return the size measured from disk
    pub async fn save(&self, disk_name: &str, data: &[u8]) -> io::Result<u64> {
        let path = self.full_path(disk_name);
        tokio::fs::write(&path, data).await?;

        let metadata = tokio::fs::metadata(&path).await?;
        Ok(metadata.len())
    }

    /// Read a stored file back into memory
    pub async fn read(&self, disk_name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.full_path(disk_name)).await
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn remove(&self, disk_name: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.full_path(disk_name)).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Reduce a client-supplied file name to a safe form.
///
/// Keeps only the final path component and maps anything outside
/// `[A-Za-z0-9._-]` to an underscore. Leading dots are stripped so the
/// result can never be a hidden file. May return an empty string.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Build a collision-resistant on-disk name from a sanitized file name
pub fn unique_disk_name(sanitized: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("C:\\temp\\report.pdf"), "report.pdf");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my report (v2).pdf"), "my_report__v2_.pdf");
        assert_eq!(sanitize_file_name(".hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_file_name("..."), "");
    }

    #[test]
    fn unique_names_differ_for_identical_input() {
        let a = unique_disk_name("same.pdf");
        let b = unique_disk_name("same.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("_same.pdf"));
        // uuid4 hex token + separator
        assert_eq!(a.len(), 32 + 1 + "same.pdf".len());
    }

    #[tokio::test]
    async fn save_read_remove_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = StorageDir::new(temp_dir.path().to_path_buf());

        let size = store.save("tok_report.pdf", b"%PDF-1.4 test").await.unwrap();
        assert_eq!(size, 13);

        let bytes = store.read("tok_report.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 test");

        store.remove("tok_report.pdf").await.unwrap();
        assert!(store.read("tok_report.pdf").await.is_err());

        // Removing again is silent
        store.remove("tok_report.pdf").await.unwrap();
    }
}
