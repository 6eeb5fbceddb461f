//! Document source implementations.

use std::path::Path;

use anyhow::Context;

use alignmark_core::traits::{DocumentSource, ExtractedDocument};

/// Reads UTF-8 text submissions. Produces no images; any sentinel already
/// present in the file is honored as-is.
pub struct PlainTextSource;

impl DocumentSource for PlainTextSource {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn extract(&self, path: &Path) -> anyhow::Result<ExtractedDocument> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(ExtractedDocument {
            text: text.trim().to_string(),
            images: Vec::new(),
        })
    }
}

static PLAIN_TEXT: PlainTextSource = PlainTextSource;

/// Pick the document source for a file, by extension.
///
/// Returns `None` for formats no registered source can read; the caller
/// records those as extraction failures.
pub fn source_for(path: &Path) -> Option<&'static dyn DocumentSource> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "txt" | "text" | "md" => Some(&PLAIN_TEXT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn plain_text_reads_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.txt");
        std::fs::write(&path, "  body text \n").unwrap();

        let doc = PlainTextSource.extract(&path).unwrap();
        assert_eq!(doc.text, "body text");
        assert!(doc.images.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = PlainTextSource
            .extract(Path::new("/nonexistent/file.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("file.txt"));
    }

    #[test]
    fn source_selection_by_extension() {
        assert!(source_for(&PathBuf::from("a.txt")).is_some());
        assert!(source_for(&PathBuf::from("a.MD")).is_some());
        assert!(source_for(&PathBuf::from("a.docx")).is_none());
        assert!(source_for(&PathBuf::from("noext")).is_none());
    }
}
