//! PDF text extraction

use lopdf::Document;
use tracing::debug;

use crate::error::{Result, StudyError};

/// Pages read per document. Later pages are dropped to keep the prompt
/// within token limits; long documents yield partial context.
pub const MAX_PAGES: usize = 10;

/// Extract plain text from PDF bytes
///
/// Concatenates the text of at most the first [`MAX_PAGES`] pages in
/// document order, each page followed by a newline. Pages past the limit
/// are silently ignored.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| StudyError::Extract(format!("Failed to load PDF: {}", e)))?;

    let mut text = String::new();
    for (page_number, _) in doc.get_pages().into_iter().take(MAX_PAGES) {
        match doc.extract_text(&[page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                // A page with no decodable text is skipped, not fatal
                debug!("No text extracted from page {}: {}", page_number, e);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(StudyError::Extract(
            "No extractable text in PDF (image-based or encrypted?)".to_string(),
        ));
    }

    Ok(text)
}
