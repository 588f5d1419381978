//! Output types: per-document conversion results and per-batch outcomes.
//!
//! [`ConversionOutput`] is what one document yields; [`BatchOutput`] is what a
//! whole batch yields. Outcomes are plain serialisable data so callers can
//! log them, render them in a UI, or dump them as JSON (`markpack --json`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of converting a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled Markdown text, per-page sections in page order.
    pub markdown: String,
    /// Conversion statistics.
    pub stats: ConversionStats,
}

/// Statistics for a single document conversion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the document (every one produced a section).
    pub page_count: usize,
    /// Embedded images handed to the OCR engine.
    pub image_count: usize,
    /// Images whose OCR failed and were replaced with a warning line.
    pub ocr_failures: usize,
    /// Wall-clock conversion time in milliseconds.
    pub duration_ms: u64,
}

/// Page and image counts for a document, without converting it.
///
/// Produced by [`crate::convert::inspect`]; requires no OCR engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Number of pages.
    pub page_count: usize,
    /// Total embedded raster images across all pages.
    pub image_count: usize,
}

/// One named document handed to the batch packager.
#[derive(Clone)]
pub struct BatchInput {
    /// Display name, used to derive the archive entry name.
    pub name: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for BatchInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchInput")
            .field("name", &self.name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Result of packaging a batch: the archive plus one outcome per input.
///
/// Invariant: `outcomes` has exactly one entry per input, in input order —
/// no input is ever silently dropped.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Complete zip archive bytes. A batch where every input failed still
    /// yields a valid (empty) archive.
    pub archive: Vec<u8>,
    /// Per-input outcomes, in input order.
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchOutput {
    /// Number of inputs that made it into the archive.
    pub fn packaged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_packaged()).count()
    }

    /// Number of inputs that failed conversion.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.packaged_count()
    }
}

/// Outcome for one batch input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// The input's display name.
    pub name: String,
    /// What happened to it.
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn is_packaged(&self) -> bool {
        matches!(self.status, ItemStatus::Packaged { .. })
    }
}

/// Success or failure of one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Converted and written into the archive under `entry_name`.
    Packaged {
        entry_name: String,
        stats: ConversionStats,
    },
    /// Conversion failed; the input has no archive entry.
    Failed { message: String },
}
