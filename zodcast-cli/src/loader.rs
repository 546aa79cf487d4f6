//! Turns scanned manifest files into one type set.

use zodcast::manifest::{LoadedTypes, ManifestError, ManifestSet};

use crate::scanner::ManifestFile;

/// Parse every file and load them together, so references resolve across
/// files. The first failing file aborts the load.
pub fn load_manifests(files: &[ManifestFile]) -> Result<LoadedTypes, ManifestError> {
    let mut set = ManifestSet::new();
    for file in files {
        let source_name = file.relative_path.display().to_string();
        tracing::trace!(source = %source_name, "parsing manifest");
        set.add_str(source_name, &file.content, file.format)?;
    }
    set.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use zodcast::manifest::ManifestFormat;

    fn file(name: &str, format: ManifestFormat, content: &str) -> ManifestFile {
        ManifestFile {
            path: PathBuf::from(name),
            relative_path: PathBuf::from(name),
            format,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_loads_across_files() {
        let files = vec![
            file(
                "a.json",
                ManifestFormat::Json,
                r#"{ "package": "a", "roots": ["User"],
                     "types": [{ "name": "User", "fields": [{ "name": "Team", "type": "b.Team" }] }] }"#,
            ),
            file(
                "b.toml",
                ManifestFormat::Toml,
                "package = \"b\"\n[[types]]\nname = \"Team\"\nfields = []\n",
            ),
        ];

        let loaded = load_manifests(&files).unwrap();
        assert_eq!(loaded.roots.len(), 1);
        assert!(loaded.types.lookup("b", "Team").is_some());
    }

    #[test]
    fn test_error_names_the_file() {
        let files = vec![file("broken.json", ManifestFormat::Json, "{ not json")];
        let err = load_manifests(&files).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
