//! PDF text extraction.
//!
//! One resume PDF in, one string out: every page's extracted text
//! concatenated in page order with no separators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to extract text from PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
}

/// Extracts the full text of a resume PDF from its raw bytes.
///
/// Corrupt or encrypted input surfaces the parser's failure as an
/// `ExtractError`; the caller decides whether that aborts the batch.
pub fn extract_resume_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)?;
    Ok(join_pages(&pages))
}

/// Concatenates per-page text with no separators, substituting the literal
/// "None" for a page that yields no text.
fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        if page.trim().is_empty() {
            text.push_str("None");
        } else {
            text.push_str(page);
        }
    }
    text
}
