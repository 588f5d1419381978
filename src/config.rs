//! Configuration types for conversion and batch packaging.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across a batch, clone it into worker tasks, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; new fields never break existing call sites.

use crate::error::ConvertError;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::source::PdfSource;
use crate::progress::PackageProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for document conversion and batch packaging.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use markpack::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .ocr_language("eng")
///     .concurrency(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// OCR language passed to the engine, e.g. `"eng"`, `"deu"`. Default: `"eng"`.
    ///
    /// The OCR engine is a process-wide resource initialized once; the
    /// language of the first conversion in the process wins for its lifetime.
    /// Inject [`ConversionConfig::engine`] to use a differently configured
    /// engine instance.
    pub ocr_language: String,

    /// Number of documents of a batch converted concurrently. Default: 1.
    ///
    /// Conversion is CPU-bound (PDF parsing) and contends on the shared OCR
    /// engine, so sequential processing is the safe default. Raising this
    /// parallelises across independent documents only; page order inside a
    /// document is never reordered, and per-item outcomes keep input order.
    pub concurrency: usize,

    /// Pre-constructed OCR engine. Takes precedence over the shared
    /// process-wide engine. Useful in tests or when a caller needs a custom
    /// engine configuration.
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// Pre-constructed PDF source. Takes precedence over the default
    /// pdfium-backed source. Useful in tests.
    pub source: Option<Arc<dyn PdfSource + Send + Sync>>,

    /// Per-file progress events during batch packaging. Default: none.
    pub progress_callback: Option<Arc<dyn PackageProgressCallback>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ocr_language: "eng".to_string(),
            concurrency: 1,
            engine: None,
            source: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("ocr_language", &self.ocr_language)
            .field("concurrency", &self.concurrency)
            .field("engine", &self.engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("source", &self.source.as_ref().map(|_| "<dyn PdfSource>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn source(mut self, source: Arc<dyn PdfSource + Send + Sync>) -> Self {
        self.config.source = Some(source);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn PackageProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.ocr_language.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(ConvertError::InvalidConfig("concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_english() {
        let c = ConversionConfig::default();
        assert_eq!(c.ocr_language, "eng");
        assert_eq!(c.concurrency, 1);
        assert!(c.engine.is_none());
        assert!(c.source.is_none());
    }

    #[test]
    fn builder_clamps_concurrency() {
        let c = ConversionConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn builder_rejects_empty_language() {
        assert!(ConversionConfig::builder().ocr_language("").build().is_err());
    }

    #[test]
    fn debug_does_not_require_dyn_debug() {
        let c = ConversionConfig::default();
        let s = format!("{c:?}");
        assert!(s.contains("ocr_language"));
    }
}
