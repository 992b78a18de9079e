//! PDF text extraction

use lopdf::Document;
use std::path::Path;

/// Error types for text extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Parse(String),

    #[error("failed to extract text from page {page}: {message}")]
    Page { page: u32, message: String },
}

/// Extract the plain text of a PDF, in page order.
///
/// Whitespace runs within a page collapse to single spaces; pages are
/// concatenated directly. The whole document is read into memory and the
/// operation is not retried.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let mut out = String::new();
    for (page_number, _) in doc.get_pages() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::Page {
                page: page_number,
                message: e.to_string(),
            })?;
        out.push_str(&normalize_page(&page_text));
    }

    Ok(out)
}

/// Convenience wrapper reading the document from disk
pub fn extract_text_from_file<P: AsRef<Path>>(path: P) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path.as_ref())?;
    extract_text(&bytes)
}

fn normalize_page(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_page("a  b\n\tc\r\n d"), "a b c d");
    }

    #[test]
    fn test_normalize_empty_page() {
        assert_eq!(normalize_page("   \n  "), "");
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let err = extract_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_text_from_file("does/not/exist.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
