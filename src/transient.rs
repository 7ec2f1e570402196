//! Request-scoped transient files.
//!
//! A [`TransientFile`] owns a path under the transient directory for the
//! lifetime of one request and removes it when dropped, whichever way the
//! request ends.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A file on disk deleted when this guard goes out of scope.
///
/// Removal in `Drop` is a blocking `std::fs` call; it only ever unlinks one file.
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
}

impl TransientFile {
    /// Write `data` to a fresh, uniquely named file in `dir`.
    ///
    /// Only the final component of `original_name` is kept, prefixed with a
    /// UUID so concurrent uploads of the same name never collide.
    pub async fn create(dir: &Path, original_name: &str, data: &[u8]) -> std::io::Result<Self> {
        let path = dir.join(unique_name(original_name));
        // Guard first so a partial write is still cleaned up.
        let file = Self { path };
        tokio::fs::write(&file.path, data).await?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(
                    name: "transient.cleanup.removed",
                    path = %self.path.display(),
                    "Removed transient file"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    name: "transient.cleanup.failed",
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove transient file"
                );
            }
        }
    }
}

fn unique_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.pdf");
    format!("{}-{}", Uuid::new_v4(), base)
}
