//! Source document loading and provenance metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TabulaError};

/// An immutable span of source text.
///
/// A passage has no identity beyond its content; it is the unit the
/// pipeline extracts from and verifies against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    text: String,
}

impl Passage {
    /// Create a passage from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw text of the passage.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the passage contains any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Metadata about the source document a passage was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (txt, md).
    pub format: String,
    /// When the document was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Loads source documents into passages.
///
/// Accepts plain-text and markdown files. Any load failure is fatal:
/// the pipeline never starts on a document it could not read.
#[derive(Debug, Clone, Default)]
pub struct Loader;

impl Loader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file path.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Passage, SourceMetadata)> {
        let path = path.as_ref();
        let format = detect_format(path)?;

        let raw = fs::read(path).map_err(|source| TabulaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = String::from_utf8(raw.clone()).map_err(|_| {
            TabulaError::UnsupportedFormat(format!("'{}' is not valid UTF-8", path.display()))
        })?;

        if text.trim().is_empty() {
            return Err(TabulaError::EmptyDocument(format!(
                "'{}' contains no text",
                path.display()
            )));
        }

        let mut hasher = Sha256::new();
        hasher.update(&raw);
        let hash = format!("{:x}", hasher.finalize());

        let metadata = SourceMetadata {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash,
            size_bytes: raw.len() as u64,
            format,
            loaded_at: Utc::now(),
        };

        Ok((Passage::new(text), metadata))
    }

    /// Load a document from an in-memory string.
    pub fn load_str(&self, text: &str) -> Result<Passage> {
        if text.trim().is_empty() {
            return Err(TabulaError::EmptyDocument(
                "input text contains no content".to_string(),
            ));
        }
        Ok(Passage::new(text))
    }
}

/// Map a file extension to a supported format name.
fn detect_format(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "text" => Ok("txt".to_string()),
        "md" | "markdown" => Ok("md".to_string()),
        other => Err(TabulaError::UnsupportedFormat(format!(
            "extension '{}' (expected txt or md)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn create_test_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    #[test]
    fn test_load_text_file() {
        let file = create_test_file(".txt", "Revenue rose 12% in Q1 and 15% in Q2.");

        let loader = Loader::new();
        let (passage, metadata) = loader.load_file(file.path()).unwrap();

        assert!(passage.text().contains("Revenue"));
        assert_eq!(metadata.format, "txt");
        assert_eq!(metadata.size_bytes, 37);
        assert_eq!(metadata.hash.len(), 64);
    }

    #[test]
    fn test_load_markdown_file() {
        let file = create_test_file(".md", "# Report\n\nGroup A improved by 20%.");

        let loader = Loader::new();
        let (_, metadata) = loader.load_file(file.path()).unwrap();
        assert_eq!(metadata.format, "md");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = create_test_file(".pdf", "binary-ish");

        let loader = Loader::new();
        let err = loader.load_file(file.path()).unwrap_err();
        assert!(matches!(err, TabulaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let file = create_test_file(".txt", "   \n\t  ");

        let loader = Loader::new();
        let err = loader.load_file(file.path()).unwrap_err();
        assert!(matches!(err, TabulaError::EmptyDocument(_)));
    }

    #[test]
    fn test_missing_file() {
        let loader = Loader::new();
        let err = loader.load_file("/no/such/file.txt").unwrap_err();
        assert!(matches!(err, TabulaError::Io { .. }));
    }

    #[test]
    fn test_load_str() {
        let loader = Loader::new();
        let passage = loader.load_str("Week 1 showed a 20% reduction.").unwrap();
        assert!(!passage.is_empty());

        assert!(loader.load_str("  ").is_err());
    }
}
