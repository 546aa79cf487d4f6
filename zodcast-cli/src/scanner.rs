//! Manifest scanner.
//!
//! Recursively walks a directory for `*.json` and `*.toml` type manifests,
//! respecting `.gitignore` patterns and an optional glob filter.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use zodcast::manifest::ManifestFormat;

use crate::config::CONFIG_FILENAME;
use crate::error::{CliResult, ScanError};

/// A discovered manifest file with its content.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    pub format: ManifestFormat,

    /// File content.
    pub content: String,
}

/// Scanner for discovering manifest files.
#[derive(Debug)]
pub struct ManifestScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter on relative paths.
    filter: Option<glob::Pattern>,
}

impl ManifestScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Only include files whose relative path matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the directory and return all manifests, sorted by relative path.
    ///
    /// The configuration file is never treated as a manifest.
    pub fn scan(&self) -> CliResult<Vec<ManifestFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(format) = ManifestFormat::from_path(path) else {
                continue;
            };

            if path.file_name().is_some_and(|name| name == CONFIG_FILENAME) {
                continue;
            }

            let relative_path = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative_path) {
                    tracing::trace!(path = %relative_path.display(), "filtered out");
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(ManifestFile {
                path: path.to_path_buf(),
                relative_path,
                format,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_manifests(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!(root = %self.root.display(), count = files.len(), "scanned manifests");
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<ManifestFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoManifests { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("app.json"), "{}").unwrap();
        fs::write(dir.path().join("zodcast.toml"), "[output]").unwrap();

        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/user.toml"), "package = \"m\"").unwrap();
        fs::write(dir.path().join("models/audit.json"), "{}").unwrap();

        fs::write(dir.path().join("README.md"), "# Test").unwrap();
        fs::write(dir.path().join("main.go"), "package main").unwrap();

        dir
    }

    fn relative_paths(files: &[ManifestFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_finds_manifests_sorted() {
        let dir = create_test_dir();
        let files = ManifestScanner::new(dir.path()).scan().unwrap();

        assert_eq!(
            relative_paths(&files),
            vec!["app.json", "models/audit.json", "models/user.toml"]
        );
        assert_eq!(files[2].format, ManifestFormat::Toml);
        assert_eq!(files[2].content, "package = \"m\"");
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let files = ManifestScanner::new(dir.path())
            .with_filter("models/*.json")
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(relative_paths(&files), vec!["models/audit.json"]);
    }

    #[test]
    fn test_invalid_filter() {
        let err = ManifestScanner::new(".").with_filter("[").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = create_test_dir();
        fs::write(dir.path().join(".gitignore"), "models/\n").unwrap();

        let files = ManifestScanner::new(dir.path()).scan().unwrap();
        assert_eq!(relative_paths(&files), vec!["app.json"]);

        let files = ManifestScanner::new(dir.path())
            .with_gitignore(false)
            .scan()
            .unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = ManifestScanner::new("/nonexistent/path").scan();
        assert!(matches!(
            result.unwrap_err(),
            crate::error::CliError::Scan(ScanError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let scanner = ManifestScanner::new(dir.path());

        assert!(matches!(
            scanner.scan().unwrap_err(),
            crate::error::CliError::Scan(ScanError::NoManifests { .. })
        ));
        assert!(scanner.scan_allow_empty().unwrap().is_empty());
    }
}
