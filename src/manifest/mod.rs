//! Merge manifest
//!
//! Plain-text list of source files, one path per line, read once at the
//! start of a run. Order defines merge order; duplicates and blank entries
//! are kept as written.

use std::path::{Path, PathBuf};

use amalgam_filter::split_lines;
use serde::{Deserialize, Serialize};

/// Ordered list of files to merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<String>,
}

/// Errors that can occur when loading the manifest. All of them end the run.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest {} is not valid UTF-8", .0.display())]
    InvalidUtf8(PathBuf),
}

impl Manifest {
    /// Load the manifest from a file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
            _ => ManifestError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let text = String::from_utf8(bytes).map_err(|_| ManifestError::InvalidUtf8(path.to_path_buf()))?;
        Ok(Self::parse(&text))
    }

    /// Parse manifest text. Lines end at `\n`, `\r\n` or a lone `\r`, and each
    /// is trimmed of surrounding whitespace.
    pub fn parse(text: &str) -> Self {
        // Splits fall on ASCII bytes, so every slice is valid UTF-8.
        Self {
            entries: split_lines(text.as_bytes())
                .map(|line| String::from_utf8_lossy(line).trim().to_string())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        let manifest = Manifest::parse("b.h\na.h\nb.h\n");
        assert_eq!(manifest.entries, vec!["b.h", "a.h", "b.h"]);
    }

    #[test]
    fn test_parse_trims_whitespace_and_crlf() {
        let manifest = Manifest::parse("  Color.h \r\n\tRgb.cpp\r\n");
        assert_eq!(manifest.entries, vec!["Color.h", "Rgb.cpp"]);
    }

    #[test]
    fn test_parse_splits_on_lone_cr() {
        let manifest = Manifest::parse("a.h\rb.h\r");
        assert_eq!(manifest.entries, vec!["a.h", "b.h"]);

        let manifest = Manifest::parse("a.h\r\rb.h");
        assert_eq!(manifest.entries, vec!["a.h", "", "b.h"]);
    }

    #[test]
    fn test_parse_keeps_blank_lines() {
        let manifest = Manifest::parse("a.h\n\n   \nb.h");
        assert_eq!(manifest.entries, vec!["a.h", "", "", "b.h"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(Manifest::parse("").is_empty());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Files.txt");
        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Files.txt");
        std::fs::write(&path, [0x61, 0xff, 0x0a]).unwrap();
        assert!(matches!(Manifest::load(&path), Err(ManifestError::InvalidUtf8(_))));
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Manifest::load(dir.path()), Err(ManifestError::Io { .. })));
    }

    #[test]
    fn test_load_reads_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Files.txt");
        std::fs::write(&path, "Document.h\nDocument.cpp\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.iter().collect::<Vec<_>>(), vec!["Document.h", "Document.cpp"]);
    }
}
