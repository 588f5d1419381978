//! Error types for the markpack library.
//!
//! Three distinct error types reflect three distinct failure scopes:
//!
//! * [`OcrError`] — **Fatal to one image**: the OCR engine could not produce
//!   text for a single embedded image. Recovered inline by the converter,
//!   which emits a warning line into the Markdown instead of the OCR text.
//!   Never propagated past the image.
//!
//! * [`ConvertError`] — **Fatal to one document**: the bytes are not an
//!   openable PDF, or the PDF engine failed mid-document. Returned as
//!   `Err(ConvertError)` from the `convert*` functions and recovered at the
//!   batch level as a per-item failure outcome.
//!
//! * [`PackageError`] — **Fatal to the whole batch**: the output archive
//!   itself cannot be written. Propagated to the caller, since no recovery is
//!   meaningful once the output medium is unusable.
//!
//! The separation keeps containment boundaries explicit: a failure is handled
//! at the smallest scope that can absorb it, and each absorbed failure leaves
//! a visible marker (a warning line in the Markdown, or a recorded outcome).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors for a single document conversion.
///
/// Image-level OCR failures use [`OcrError`] and surface as warning lines in
/// the produced Markdown rather than being propagated here.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input bytes could not be opened as a PDF document.
    #[error("not a valid PDF document: {detail}")]
    DocumentParse { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
         Install libpdfium or point PDFIUM_DYNAMIC_LIB_PATH at an existing copy."
    )]
    PdfiumBinding(String),

    /// Text extraction failed for a specific page.
    #[error("text extraction failed on page {page}: {detail}")]
    PageText { page: usize, detail: String },

    /// Embedded-image enumeration failed for a specific page.
    #[error("image enumeration failed on page {page}: {detail}")]
    PageImages { page: usize, detail: String },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single embedded image's OCR.
///
/// The converter catches this locally, appends a warning line identifying the
/// image, and continues with the rest of the document.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The OCR engine binary or model is not installed.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine ran but failed to recognize the image.
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    /// Staging the image bytes or talking to the engine failed.
    #[error("I/O error during OCR: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a whole batch packaging operation.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The zip writer rejected an entry or could not finalise the archive.
    #[error("archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O failure while writing archive content.
    #[error("I/O error while writing archive: {0}")]
    Io(#[from] std::io::Error),

    /// Could not write the archive file to disk.
    #[error("failed to write archive file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_parse_display() {
        let e = ConvertError::DocumentParse {
            detail: "bad xref table".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("not a valid PDF"), "got: {msg}");
        assert!(msg.contains("bad xref table"));
    }

    #[test]
    fn page_text_display_is_one_based() {
        let e = ConvertError::PageText {
            page: 3,
            detail: "glyph table truncated".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }

    #[test]
    fn ocr_unavailable_display() {
        let e = OcrError::EngineUnavailable("tesseract not found".into());
        assert!(e.to_string().contains("tesseract not found"));
    }

    #[test]
    fn ocr_io_wraps_std_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = OcrError::from(io);
        assert!(matches!(e, OcrError::Io(_)));
        assert!(e.to_string().contains("denied"));
    }

    #[test]
    fn output_write_display_names_path() {
        let e = PackageError::OutputWrite {
            path: PathBuf::from("/tmp/out.zip"),
            source: std::io::Error::other("disk full"),
        };
        assert!(e.to_string().contains("/tmp/out.zip"));
    }
}
