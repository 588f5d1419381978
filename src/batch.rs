//! Batch packaging: convert many documents and zip the results.
//!
//! ## Failure isolation
//!
//! The packager never lets one document take down the batch: each input's
//! conversion error is recorded as an [`ItemStatus::Failed`] outcome and the
//! loop moves on. Only the archive itself failing to write aborts the whole
//! operation — once the output medium is unusable there is nothing left to
//! salvage.
//!
//! ## Entry naming
//!
//! Entry names are derived from input names by replacing the extension with
//! `.md`. Names are unique within the archive: when two inputs collapse to
//! the same derived name, deterministic numeric suffixing in input order
//! (`report.md`, `report-2.md`, …) disambiguates, so no input is silently
//! overwritten.

use crate::config::ConversionConfig;
use crate::convert;
use crate::error::{ConvertError, PackageError};
use crate::output::{BatchInput, BatchOutput, ConversionOutput, ItemOutcome, ItemStatus};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Packages a batch of documents into a zip archive of Markdown files.
pub struct BatchPackager {
    config: ConversionConfig,
}

impl BatchPackager {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Convert every input and assemble the archive.
    ///
    /// Inputs are processed in order (concurrently when
    /// `config.concurrency > 1`, which still reports results in input
    /// order). Returns the archive bytes plus one outcome per input; a batch
    /// where every document failed still yields a valid, empty archive.
    ///
    /// # Errors
    /// Only archive-write failures abort the batch. Per-document failures
    /// are recorded in the outcomes.
    pub async fn package(&self, inputs: Vec<BatchInput>) -> Result<BatchOutput, PackageError> {
        let total = inputs.len();
        info!("packaging batch of {} documents", total);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_batch_start(total);
        }

        let results: Vec<(String, Result<ConversionOutput, ConvertError>)> =
            if self.config.concurrency <= 1 {
                let mut results = Vec::with_capacity(total);
                for (index, input) in inputs.into_iter().enumerate() {
                    results.push(self.convert_item(index, total, input).await);
                }
                results
            } else {
                // `buffered` (not `buffer_unordered`) keeps results in input
                // order regardless of completion order.
                stream::iter(
                    inputs
                        .into_iter()
                        .enumerate()
                        .map(|(index, input)| self.convert_item(index, total, input)),
                )
                .buffered(self.config.concurrency)
                .collect()
                .await
            };

        let mut taken = HashSet::new();
        let mut entries: Vec<(String, String)> = Vec::with_capacity(results.len());
        let mut outcomes = Vec::with_capacity(results.len());

        for (name, result) in results {
            match result {
                Ok(output) => {
                    let entry_name = derive_entry_name(&name, &mut taken);
                    debug!("'{}' → archive entry '{}'", name, entry_name);
                    outcomes.push(ItemOutcome {
                        name,
                        status: ItemStatus::Packaged {
                            entry_name: entry_name.clone(),
                            stats: output.stats,
                        },
                    });
                    entries.push((entry_name, output.markdown));
                }
                Err(e) => {
                    warn!("document '{}' failed: {}", name, e);
                    outcomes.push(ItemOutcome {
                        name,
                        status: ItemStatus::Failed {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }
        debug_assert_eq!(outcomes.len(), total);

        let archive = write_archive(&entries)?;

        if let Some(cb) = &self.config.progress_callback {
            cb.on_batch_complete(total, entries.len());
        }
        info!(
            "batch complete: {}/{} documents packaged, archive is {} bytes",
            entries.len(),
            total,
            archive.len()
        );

        Ok(BatchOutput { archive, outcomes })
    }

    async fn convert_item(
        &self,
        index: usize,
        total: usize,
        input: BatchInput,
    ) -> (String, Result<ConversionOutput, ConvertError>) {
        let BatchInput { name, bytes } = input;
        if let Some(cb) = &self.config.progress_callback {
            cb.on_item_start(index, total, &name);
        }

        let result = convert::convert(bytes, &self.config).await;

        if let Some(cb) = &self.config.progress_callback {
            match &result {
                Ok(output) => cb.on_item_complete(index, total, &name, output.markdown.len()),
                Err(e) => cb.on_item_error(index, total, &name, &e.to_string()),
            }
        }
        (name, result)
    }
}

/// Convert a batch of named documents into a zip archive of Markdown files.
///
/// This is the primary batch entry point for the library.
///
/// # Example
/// ```rust,no_run
/// use markpack::{package, BatchInput, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let inputs = vec![BatchInput::new("report.pdf", std::fs::read("report.pdf")?)];
/// let output = package(inputs, &ConversionConfig::default()).await?;
/// std::fs::write("processed_documents.zip", &output.archive)?;
/// for outcome in &output.outcomes {
///     println!("{outcome:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn package(
    inputs: Vec<BatchInput>,
    config: &ConversionConfig,
) -> Result<BatchOutput, PackageError> {
    BatchPackager::new(config.clone()).package(inputs).await
}

/// Package a batch and write the archive directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial archives.
/// Returns the per-item outcomes.
pub async fn package_to_file(
    inputs: Vec<BatchInput>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<Vec<ItemOutcome>, PackageError> {
    let output = package(inputs, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PackageError::OutputWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&tmp_path, &output.archive)
        .await
        .map_err(|e| PackageError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PackageError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.outcomes)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Derive a unique archive entry name from an input name.
///
/// Replaces the final extension with `.md`; on collision appends `-2`,
/// `-3`, … before the extension, in input order.
fn derive_entry_name(name: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = Path::new(name)
        .with_extension("md")
        .to_string_lossy()
        .into_owned();
    if candidate.is_empty() || candidate == ".md" {
        candidate = "document.md".to_string();
    }

    if taken.insert(candidate.clone()) {
        return candidate;
    }

    let stem = candidate
        .strip_suffix(".md")
        .unwrap_or(candidate.as_str())
        .to_string();
    let mut n = 2usize;
    loop {
        let suffixed = format!("{stem}-{n}.md");
        if taken.insert(suffixed.clone()) {
            return suffixed;
        }
        n += 1;
    }
}

/// Write the entries into an in-memory zip archive, each one
/// deflate-compressed.
fn write_archive(entries: &[(String, String)]) -> Result<Vec<u8>, PackageError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (entry_name, markdown) in entries {
        writer.start_file(entry_name.as_str(), options)?;
        writer.write_all(markdown.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn entry_name_replaces_extension() {
        let mut taken = HashSet::new();
        assert_eq!(derive_entry_name("report.pdf", &mut taken), "report.md");
        assert_eq!(derive_entry_name("scan.PDF", &mut taken), "scan.md");
        assert_eq!(derive_entry_name("no_extension", &mut taken), "no_extension.md");
    }

    #[test]
    fn entry_name_collisions_get_numeric_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(derive_entry_name("report.pdf", &mut taken), "report.md");
        assert_eq!(derive_entry_name("report.PDF", &mut taken), "report-2.md");
        assert_eq!(derive_entry_name("report", &mut taken), "report-3.md");
    }

    #[test]
    fn entry_name_for_degenerate_input() {
        let mut taken = HashSet::new();
        assert_eq!(derive_entry_name("", &mut taken), "document.md");
    }

    #[test]
    fn archive_round_trips_deflated_entries() {
        let entries = vec![
            ("a.md".to_string(), "## Page 1\n\nHello".to_string()),
            ("b.md".to_string(), "## Page 1\n\nWorld".to_string()),
        ];
        let bytes = write_archive(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a.md")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "## Page 1\n\nHello");
    }

    #[test]
    fn empty_batch_still_yields_valid_archive() {
        let bytes = write_archive(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
