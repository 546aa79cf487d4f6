//! Output file handling.
//!
//! Writes the generated TypeScript file, leaves identical files untouched,
//! and compares existing output for `validate`.

use std::path::{Path, PathBuf};

use crate::error::{CliResult, WriteError};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf, bytes: usize },
    /// File already held exactly this content.
    Unchanged { path: PathBuf },
    /// Dry run: content was not written.
    DryRun { content: String, path: PathBuf },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file, creating parent directories as needed.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            tracing::debug!(path = %path.display(), "output unchanged");
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Whether the file on disk changed.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

/// Whether `existing` matches freshly generated output, ignoring leading
/// and trailing whitespace.
pub fn is_up_to_date(existing: &str, generated: &str) -> bool {
    existing.trim() == generated.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT: &str = "export const TSchema = z.object({\n})\n";

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemas.ts");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("web/src/generated/schemas.ts");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(matches!(result, WriteResult::Written { bytes, .. } if bytes == CONTENT.len()));
        assert!(path.exists());
    }

    #[test]
    fn test_identical_content_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemas.ts");
        let writer = FileWriter::new(false);

        writer.write(&path, CONTENT).unwrap();
        let second = writer.write(&path, CONTENT).unwrap();
        assert!(matches!(second, WriteResult::Unchanged { .. }));
        assert!(!second.was_written());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemas.ts");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(!path.exists());
        assert_eq!(result.path(), path.as_path());
        assert!(matches!(result, WriteResult::DryRun { ref content, .. } if content == CONTENT));
    }

    #[test]
    fn test_up_to_date_ignores_surrounding_whitespace() {
        assert!(is_up_to_date("\nexport const A = 1\n\n", "export const A = 1\n"));
        assert!(!is_up_to_date("export const A = 1", "export const A = 2"));
    }
}
