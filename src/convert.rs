//! Per-document conversion: one PDF's bytes in, one Markdown document out.
//!
//! ## Pipeline
//!
//! The converter walks pages in strict ascending order — page order is the
//! only defined output order. Each page contributes a text section and, when
//! the page embeds raster images, an image subsection whose entries are OCR
//! transcriptions. An OCR failure is absorbed at the image boundary: the
//! entry becomes a warning line and the rest of the document is unaffected.
//!
//! ## Blocking core, async facade
//!
//! pdfium and the tesseract subprocess are blocking, so
//! [`DocumentConverter::convert`] is synchronous and the async entry points
//! ([`convert`], [`inspect`]) move the whole conversion onto the blocking
//! thread pool via `tokio::task::spawn_blocking`, keeping the async executor
//! free for callers that drive many documents.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats, DocumentSummary};
use crate::pipeline::assemble;
use crate::pipeline::ocr::{self, OcrEngine};
use crate::pipeline::source::{PdfSource, PdfiumSource};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converts one PDF document to Markdown.
///
/// Holds the two injected capabilities: a [`PdfSource`] to read the document
/// and an [`OcrEngine`] to transcribe embedded images. Construct with
/// [`DocumentConverter::new`] to inject both (tests), or
/// [`DocumentConverter::from_config`] for the default pdfium source and the
/// shared process-wide OCR engine.
pub struct DocumentConverter {
    source: Box<dyn PdfSource>,
    engine: Arc<dyn OcrEngine>,
}

impl DocumentConverter {
    /// Create a converter from explicit capabilities.
    pub fn new(source: impl PdfSource + 'static, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            source: Box::new(source),
            engine,
        }
    }

    /// Create a converter from a config.
    ///
    /// Resolution mirrors the config's override fields: a pre-built
    /// capability wins; otherwise the default pdfium source is bound and the
    /// process-wide OCR engine (first-configured language) is reused.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, ConvertError> {
        let source: Box<dyn PdfSource> = match &config.source {
            Some(source) => Box::new(Arc::clone(source)),
            None => Box::new(PdfiumSource::new()?),
        };
        let engine: Arc<dyn OcrEngine> = match &config.engine {
            Some(engine) => Arc::clone(engine),
            None => ocr::shared_engine(&config.ocr_language),
        };
        Ok(Self { source, engine })
    }

    /// Convert one document's bytes to Markdown.
    ///
    /// # Errors
    /// [`ConvertError::DocumentParse`] when the bytes cannot be opened as a
    /// PDF, or a page-level error when the PDF engine fails mid-document.
    /// OCR failures never surface here — they become warning lines in the
    /// output. The opened document is released on every exit path.
    pub fn convert(&self, bytes: &[u8]) -> Result<ConversionOutput, ConvertError> {
        let start = Instant::now();
        let document = self.source.open(bytes)?;
        let page_count = document.page_count();
        info!("converting document: {} pages", page_count);

        let mut sections: Vec<String> = Vec::new();
        let mut image_count = 0usize;
        let mut ocr_failures = 0usize;

        for index in 0..page_count {
            let text = document.page_text(index)?;
            sections.push(assemble::page_section(index + 1, &text));

            let images = document.page_images(index)?;
            if !images.is_empty() {
                sections.push(assemble::images_heading(index + 1));
            }

            for image in &images {
                image_count += 1;
                match self.engine.recognize(&image.data) {
                    Ok(fragments) => {
                        sections.push(assemble::ocr_entry(image.index + 1, &fragments));
                    }
                    Err(e) => {
                        // Absorbed at the image boundary; the warning line
                        // keeps the loss visible in the output.
                        warn!(
                            "OCR failed for image {} on page {}: {}",
                            image.index + 1,
                            index + 1,
                            e
                        );
                        ocr_failures += 1;
                        sections.push(assemble::ocr_warning(image.index + 1, &e));
                    }
                }
            }
        }

        let markdown = assemble::assemble_document(&sections);
        debug!(
            "document assembled: {} pages, {} images, {} bytes of markdown",
            page_count,
            image_count,
            markdown.len()
        );

        Ok(ConversionOutput {
            markdown,
            stats: ConversionStats {
                page_count,
                image_count,
                ocr_failures,
                duration_ms: start.elapsed().as_millis() as u64,
            },
        })
        // `document` is dropped here — and on every `?` above — closing the
        // underlying PDF.
    }
}

/// Convert PDF bytes to Markdown.
///
/// This is the primary async entry point for the library. The conversion
/// runs on the blocking thread pool.
///
/// # Example
/// ```rust,no_run
/// use markpack::{convert, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("document.pdf")?;
/// let output = convert(bytes, &ConversionConfig::default()).await?;
/// println!("{}", output.markdown);
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || DocumentConverter::from_config(&config)?.convert(&bytes))
        .await
        .map_err(|e| ConvertError::Internal(format!("conversion task panicked: {e}")))?
}

/// Synchronous wrapper around the conversion pipeline.
///
/// The core is blocking anyway; this just skips the executor round-trip for
/// callers without a runtime.
pub fn convert_sync(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    DocumentConverter::from_config(config)?.convert(bytes)
}

/// Count pages and embedded images without converting.
///
/// Does not touch the OCR engine.
pub async fn inspect(
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<DocumentSummary, ConvertError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || inspect_blocking(&bytes, &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("inspect task panicked: {e}")))?
}

fn inspect_blocking(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<DocumentSummary, ConvertError> {
    let source: Box<dyn PdfSource> = match &config.source {
        Some(source) => Box::new(Arc::clone(source)),
        None => Box::new(PdfiumSource::new()?),
    };
    let document = source.open(bytes)?;
    let page_count = document.page_count();
    let mut image_count = 0usize;
    for index in 0..page_count {
        image_count += document.page_images(index)?.len();
    }
    Ok(DocumentSummary {
        page_count,
        image_count,
    })
}
