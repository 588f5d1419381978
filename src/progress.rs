//! Progress-callback trait for per-file batch events.
//!
//! Inject an `Arc<dyn PackageProgressCallback>` via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! real-time events as the packager works through a batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a WebSocket, or a database
//! record without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so it works correctly when
//! documents are processed concurrently.

use std::sync::Arc;

/// Called by the batch packager as it processes each input.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. When `concurrency > 1`, per-item methods may be
/// called concurrently from different threads; implementations must protect
/// shared mutable state accordingly.
pub trait PackageProgressCallback: Send + Sync {
    /// Called once before any input is converted.
    fn on_batch_start(&self, total_inputs: usize) {
        let _ = total_inputs;
    }

    /// Called just before an input's conversion begins.
    ///
    /// `index` is 0-based input position.
    fn on_item_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when an input converted successfully.
    ///
    /// `markdown_len` is the byte length of the produced Markdown.
    fn on_item_complete(&self, index: usize, total: usize, name: &str, markdown_len: usize) {
        let _ = (index, total, name, markdown_len);
    }

    /// Called when an input's conversion failed.
    fn on_item_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called once after all inputs have been attempted and the archive is
    /// assembled.
    fn on_batch_complete(&self, total_inputs: usize, packaged_count: usize) {
        let _ = (total_inputs, packaged_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PackageProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn PackageProgressCallback>;
