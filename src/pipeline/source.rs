//! PDF source capability: open a document from bytes and read pages.
//!
//! ## Why a trait seam?
//!
//! The converter only needs three things from a PDF engine: a page count,
//! per-page plain text, and per-page embedded raster images. Putting that
//! behind [`PdfSource`] / [`DocumentHandle`] keeps the engine swappable and
//! lets tests drive the converter with fixture pages instead of real PDFs.
//!
//! ## Why `Drop` instead of an explicit close?
//!
//! The document handle must be released on every exit path, including early
//! `?` returns from a failed page. Tying the release to `Drop` on the boxed
//! handle makes that guarantee structural rather than a call-site convention.

use crate::error::ConvertError;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

/// One embedded raster image, materialized as encoded bytes.
///
/// `data` is PNG-encoded regardless of how the image was stored in the PDF,
/// so the OCR engine always receives a format it can decode. The image is
/// transient: it lives only long enough to be handed to OCR.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// 0-based ordinal within the page (displayed 1-based).
    pub index: usize,
    /// Encoded image bytes.
    pub data: Vec<u8>,
}

/// Capability to open PDF documents from raw bytes.
pub trait PdfSource {
    /// Open a document. Fails with [`ConvertError::DocumentParse`] when the
    /// bytes are not an openable PDF. The returned handle releases the
    /// underlying document when dropped.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn DocumentHandle + 'a>, ConvertError>;
}

impl<S: PdfSource + ?Sized> PdfSource for Arc<S> {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn DocumentHandle + 'a>, ConvertError> {
        (**self).open(bytes)
    }
}

/// An opened document. Pages are addressed by 0-based index.
pub trait DocumentHandle {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of one page, in the engine's reading order.
    fn page_text(&self, index: usize) -> Result<String, ConvertError>;

    /// Embedded raster images of one page, in the order the engine reports
    /// them.
    fn page_images(&self, index: usize) -> Result<Vec<EmbeddedImage>, ConvertError>;
}

// ── pdfium implementation ────────────────────────────────────────────────

/// The default [`PdfSource`], backed by the pdfium library.
pub struct PdfiumSource {
    pdfium: Pdfium,
}

impl PdfiumSource {
    /// Bind to a pdfium library and create the source.
    ///
    /// Looks for the library in the current directory first, then falls back
    /// to the system search path (honouring `PDFIUM_DYNAMIC_LIB_PATH`).
    pub fn new() -> Result<Self, ConvertError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ConvertError::PdfiumBinding(format!("{e:?}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfSource for PdfiumSource {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn DocumentHandle + 'a>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| ConvertError::DocumentParse {
                detail: format!("{e:?}"),
            })?;
        debug!("PDF opened: {} pages", document.pages().len());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl DocumentHandle for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, ConvertError> {
        let pages = self.document.pages();
        let page = pages
            .get(index as u16)
            .map_err(|e| ConvertError::PageText {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;
        let text = page
            .text()
            .map_err(|e| ConvertError::PageText {
                page: index + 1,
                detail: format!("{e:?}"),
            })?
            .all();
        Ok(text)
    }

    fn page_images(&self, index: usize) -> Result<Vec<EmbeddedImage>, ConvertError> {
        let pages = self.document.pages();
        let page = pages
            .get(index as u16)
            .map_err(|e| ConvertError::PageImages {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;

        let objects = page.objects();
        let mut images = Vec::new();
        for object in objects.iter() {
            let Some(image_object) = object.as_image_object() else {
                continue;
            };
            // An object pdfium cannot materialize is simply not reported;
            // one broken XObject must not take the document down.
            let raw = match image_object.get_raw_image() {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "skipping unextractable image object on page {}: {:?}",
                        index + 1,
                        e
                    );
                    continue;
                }
            };
            let mut data = Vec::new();
            if let Err(e) = raw.write_to(&mut Cursor::new(&mut data), ImageFormat::Png) {
                warn!("skipping unencodable image on page {}: {}", index + 1, e);
                continue;
            }
            images.push(EmbeddedImage {
                index: images.len(),
                data,
            });
        }
        debug!("page {}: {} embedded images", index + 1, images.len());
        Ok(images)
    }
}
