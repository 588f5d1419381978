//! Markdown assembly: deterministic rendering of page and image sections.
//!
//! The output format is a contract: tests and downstream consumers match on
//! it byte for byte. Per page, a `## Page {n}` heading followed by a blank
//! line and the extracted text; if the page carries images, a
//! `### Images on Page {n}` heading; per image, a bold `**Image {m} OCR:**`
//! label with the space-joined fragments on the next line, or a warning line
//! when OCR failed. Sections are joined with blank lines. All ordinals are
//! 1-based for display.

use crate::error::OcrError;

/// Page section: heading, blank line, extracted text.
///
/// Emitted unconditionally — a page with empty text still gets its heading.
pub fn page_section(page_num: usize, text: &str) -> String {
    format!("## Page {page_num}\n\n{text}")
}

/// Heading announcing the image subsection of a page.
///
/// Only emitted when the page has at least one embedded image.
pub fn images_heading(page_num: usize) -> String {
    format!("### Images on Page {page_num}")
}

/// OCR entry for one image: label plus space-joined fragments.
pub fn ocr_entry(image_num: usize, fragments: &[String]) -> String {
    format!("**Image {image_num} OCR:**\n{}", fragments.join(" "))
}

/// Warning line replacing the OCR entry of a failed image.
pub fn ocr_warning(image_num: usize, error: &OcrError) -> String {
    format!("⚠️ OCR Error for image {image_num}: {error}")
}

/// Join the collected sections into the final document.
pub fn assemble_document(sections: &[String]) -> String {
    sections.join("\n\n")
}
