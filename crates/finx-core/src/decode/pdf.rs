//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{Result, TextLine, TextSource};
use crate::error::DecodeError;

/// PDF text extractor.
///
/// lopdf validates the document and removes empty-password encryption;
/// pdf-extract produces the text, which is split into numbered lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Load the document and return bytes that pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Pdf(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DecodeError::NoPages);
        }

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DecodeError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DecodeError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
            return Ok(decrypted);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(data.to_vec())
    }
}

impl TextSource for PdfTextExtractor {
    fn extract_lines(&self, data: &[u8]) -> Result<Vec<TextLine>> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }

        let raw = self.prepare(data)?;
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&raw))
            .map_err(|_| DecodeError::Pdf("text extraction aborted".to_string()))?
            .map_err(|e| DecodeError::Pdf(e.to_string()))?;

        // page breaks may come through as form feeds
        let lines = TextLine::numbered(text.split(['\n', '\x0c']));
        debug!("Extracted {} text lines", lines.len());
        Ok(lines)
    }

    fn backend_name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let extractor = PdfTextExtractor::new();
        assert!(matches!(extractor.extract_lines(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_invalid_pdf_rejected() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_lines(b"%PDF-broken");
        assert!(matches!(result, Err(DecodeError::Pdf(_))));
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(PdfTextExtractor::new().backend_name(), "pdf-extract");
    }
}
