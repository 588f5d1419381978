//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one capability or transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different OCR engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ source ──▶ ocr ──▶ assemble
//!          (pdfium)  (tesseract)  (markdown)
//! ```
//!
//! 1. [`source`]   — open the document and read per-page text and embedded
//!    images via pdfium; blocking, so conversions run on the blocking pool
//! 2. [`ocr`]      — stage each image in a scoped tempfile and drive the
//!    tesseract subprocess; the only stage with a shared process-wide
//!    resource
//! 3. [`assemble`] — deterministic Markdown section rendering and final
//!    document assembly
pub mod assemble;
pub mod ocr;
pub mod source;
