//! Shared test fixtures: an in-memory PDF source and a deterministic OCR
//! engine, driving the converter through its public capability seams.

use markpack::{
    ConvertError, DocumentHandle, EmbeddedImage, OcrEngine, OcrError, PdfSource,
};
use std::collections::HashMap;

/// One fixture page: text plus the raw bytes of each embedded image.
#[derive(Clone, Default)]
pub struct FixturePage {
    pub text: String,
    pub images: Vec<Vec<u8>>,
}

impl FixturePage {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, bytes: &[u8]) -> Self {
        self.images.push(bytes.to_vec());
        self
    }
}

/// A [`PdfSource`] backed by a map from input bytes to fixture pages.
///
/// Bytes not present in the map fail to open, like a corrupt PDF.
#[derive(Default)]
pub struct FixtureSource {
    documents: HashMap<Vec<u8>, Vec<FixturePage>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(mut self, bytes: &[u8], pages: Vec<FixturePage>) -> Self {
        self.documents.insert(bytes.to_vec(), pages);
        self
    }
}

impl PdfSource for FixtureSource {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn DocumentHandle + 'a>, ConvertError> {
        let pages = self
            .documents
            .get(bytes)
            .ok_or_else(|| ConvertError::DocumentParse {
                detail: "unrecognised fixture bytes".to_string(),
            })?;
        Ok(Box::new(FixtureDocument { pages }))
    }
}

struct FixtureDocument<'a> {
    pages: &'a [FixturePage],
}

impl DocumentHandle for FixtureDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ConvertError> {
        Ok(self.pages[index].text.clone())
    }

    fn page_images(&self, index: usize) -> Result<Vec<EmbeddedImage>, ConvertError> {
        Ok(self.pages[index]
            .images
            .iter()
            .enumerate()
            .map(|(i, data)| EmbeddedImage {
                index: i,
                data: data.clone(),
            })
            .collect())
    }
}

/// A deterministic [`OcrEngine`]: "recognises" UTF-8 image bytes by
/// splitting them on whitespace, one fragment per word. Image bytes starting
/// with `FAIL:` produce a recognition error with the rest as the message.
pub struct EchoOcrEngine;

impl OcrEngine for EchoOcrEngine {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        let text = std::str::from_utf8(image)
            .map_err(|_| OcrError::RecognitionFailed("binary image".to_string()))?;
        if let Some(reason) = text.strip_prefix("FAIL:") {
            return Err(OcrError::RecognitionFailed(reason.to_string()));
        }
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}
