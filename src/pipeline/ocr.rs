//! OCR capability: recognize text fragments in encoded image bytes.
//!
//! ## Why a subprocess?
//!
//! Tesseract is the one OCR engine reliably present on server images, and
//! invoking the CLI keeps the crate free of C++ build dependencies. The
//! engine expects addressable storage, so the image bytes are staged in a
//! [`tempfile::NamedTempFile`] whose `Drop` guarantees the staging file is
//! gone when the call returns, on success and failure alike.
//!
//! ## Why a process-wide engine?
//!
//! OCR engines are expensive to initialize and contended when shared, so the
//! engine is created at most once per process ([`shared_engine`]) and reused
//! by every conversion until process exit. The language is fixed when the
//! engine is first built; it is never reinitialized mid-run.

use crate::error::OcrError;
use once_cell::sync::OnceCell;
use std::io::Write;
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

/// Capability to recognize text in an image.
///
/// Implementations must be `Send + Sync`: the engine instance is shared
/// across all conversions in the process, which may run on blocking-pool
/// threads.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the given encoded image bytes.
    ///
    /// Returns the recognized text fragments in reading order, with no
    /// bounding-box or confidence metadata. The caller joins fragments with
    /// single spaces.
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError>;
}

/// The default [`OcrEngine`], driving the `tesseract` command-line tool.
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    /// Create an engine for the given tesseract language code (e.g. `"eng"`).
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// The language this engine was configured with.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether the `tesseract` binary is reachable on `PATH`.
    ///
    /// Recognition does not require this check — a missing binary surfaces
    /// as [`OcrError::EngineUnavailable`] per image — but callers can use it
    /// to warn the user up front.
    pub fn is_available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        // Stage the bytes where the engine can address them. The tempfile is
        // removed on drop, whichever way this function exits.
        let mut staged = tempfile::Builder::new()
            .prefix("markpack-ocr-")
            .suffix(".png")
            .tempfile()?;
        staged.write_all(image)?;
        staged.flush()?;

        let output = Command::new("tesseract")
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let fragments = parse_fragments(&String::from_utf8_lossy(&out.stdout));
                debug!("OCR produced {} fragments", fragments.len());
                Ok(fragments)
            }
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                Err(OcrError::RecognitionFailed(stderr.trim().to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::EngineUnavailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

/// Split raw engine output into text fragments: one per non-empty line.
fn parse_fragments(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ── shared engine ────────────────────────────────────────────────────────

static SHARED_ENGINE: OnceCell<Arc<TesseractEngine>> = OnceCell::new();

/// Process-wide OCR engine: created on first use, reused by every
/// subsequent conversion, torn down at process exit.
///
/// The first caller's language wins for the process lifetime; later calls
/// with a different language reuse the existing engine. Callers that need a
/// differently configured engine inject one via
/// [`crate::config::ConversionConfig::engine`].
pub fn shared_engine(language: &str) -> Arc<TesseractEngine> {
    Arc::clone(SHARED_ENGINE.get_or_init(|| Arc::new(TesseractEngine::new(language))))
}
