//! # markpack
//!
//! Convert PDF documents to Markdown — extracting each page's text and OCR
//! transcriptions of its embedded raster images — and package batches of
//! conversions into a single zip archive of `.md` files.
//!
//! ## Why this crate?
//!
//! Scanned-ish PDFs are rarely all text or all image: a report page carries
//! selectable text next to embedded figures, stamps, and scanned exhibits
//! whose content a plain text extractor silently drops. This crate keeps
//! both: page text comes straight from the PDF engine, and every embedded
//! raster image is handed to an OCR engine whose transcription lands under
//! the page it came from. One bad image, or one bad document in a batch,
//! never takes down the rest.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Source    open via pdfium; per-page text + embedded images
//!  ├─ 2. OCR       tesseract on each image (staged in a scoped tempfile)
//!  ├─ 3. Assemble  deterministic Markdown: ## Page n / ### Images on Page n
//!  └─ 4. Package   batch results → deflate-compressed zip + per-item outcomes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use markpack::{package, BatchInput, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let inputs = vec![
//!         BatchInput::new("report.pdf", std::fs::read("report.pdf")?),
//!         BatchInput::new("scan.pdf", std::fs::read("scan.pdf")?),
//!     ];
//!     let output = package(inputs, &ConversionConfig::default()).await?;
//!     std::fs::write("processed_documents.zip", &output.archive)?;
//!     eprintln!(
//!         "{} packaged, {} failed",
//!         output.packaged_count(),
//!         output.failed_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Failure containment
//!
//! | Failure | Scope | Visible as |
//! |---------|-------|------------|
//! | OCR on one image | that image | `⚠️ OCR Error for image …` line |
//! | One document unparseable | that document | `Failed` outcome, no entry |
//! | Archive unwritable | whole batch | `Err(PackageError)` |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `markpack` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! markpack = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{package, package_to_file, BatchPackager};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, inspect, DocumentConverter};
pub use error::{ConvertError, OcrError, PackageError};
pub use output::{
    BatchInput, BatchOutput, ConversionOutput, ConversionStats, DocumentSummary, ItemOutcome,
    ItemStatus,
};
pub use pipeline::ocr::{shared_engine, OcrEngine, TesseractEngine};
pub use pipeline::source::{DocumentHandle, EmbeddedImage, PdfSource, PdfiumSource};
pub use progress::{NoopProgressCallback, PackageProgressCallback, ProgressCallback};
