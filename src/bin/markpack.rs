//! CLI binary for markpack.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, feeds the batch packager, and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use markpack::{
    inspect, package_to_file, BatchInput, ConversionConfig, ItemStatus, PackageProgressCallback,
    ProgressCallback, TesseractEngine,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live per-file progress bar and a
/// log line per document. Works correctly when documents complete
/// out-of-order (concurrent mode).
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl PackageProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_inputs: usize) {
        self.bar.set_length(total_inputs as u64);
    }

    fn on_item_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_item_complete(&self, _index: usize, _total: usize, name: &str, markdown_len: usize) {
        self.bar.println(format!(
            "  {} {:<32} {}",
            green("✓"),
            name,
            dim(&format!("{markdown_len:>6} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, _index: usize, _total: usize, name: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {:<32} {}", red("✗"), name, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_inputs: usize, packaged_count: usize) {
        self.bar.finish_and_clear();
        let failed = total_inputs.saturating_sub(packaged_count);
        if failed == 0 {
            eprintln!(
                "{} {} documents converted successfully",
                green("✔"),
                bold(&packaged_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                if packaged_count == 0 {
                    red("✘")
                } else {
                    yellow("⚠")
                },
                bold(&packaged_count.to_string()),
                total_inputs,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r####"EXAMPLES:
  # Convert a batch of PDFs into processed_documents.zip
  markpack report.pdf scan.pdf

  # Everything in a directory, custom archive name
  markpack ./inbox -o converted.zip

  # German OCR, four documents at a time
  markpack --lang deu -j 4 ./inbox

  # Machine-readable outcome report
  markpack --json ./inbox > outcomes.json

  # Page/image counts only, no conversion (no tesseract needed)
  markpack --inspect-only report.pdf

ENVIRONMENT VARIABLES:
  MARKPACK_LANG            OCR language code (default: eng)
  MARKPACK_OUTPUT          Output archive path
  PDFIUM_DYNAMIC_LIB_PATH  Path to an existing libpdfium

SETUP:
  1. Install engines:  apt install tesseract-ocr, plus a pdfium shared
     library on the system search path (or PDFIUM_DYNAMIC_LIB_PATH)
  2. Convert:          markpack documents/ -o bundle.zip

  Each archive entry is <input-base-name>.md: per page a "## Page n" section
  with the extracted text, and for pages with embedded images an
  "### Images on Page n" section with one OCR transcription per image.
"####;

/// Convert PDF files to Markdown (text + image OCR) and zip the results.
#[derive(Parser, Debug)]
#[command(
    name = "markpack",
    version,
    about = "Convert PDF files to Markdown with OCR of embedded images, packaged as a zip archive",
    long_about = "Convert PDF documents to Markdown. Page text is extracted via pdfium; every \
embedded raster image is OCRed with tesseract and transcribed under its page. Results are \
packaged into a single zip archive of .md files; a document that fails to convert is reported \
and skipped without aborting the batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files or directories (directories expand to their *.pdf files).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write the zip archive to this path.
    #[arg(short, long, env = "MARKPACK_OUTPUT", default_value = "processed_documents.zip")]
    output: PathBuf,

    /// OCR language code passed to tesseract (e.g. eng, deu, fra).
    #[arg(long, env = "MARKPACK_LANG", default_value = "eng")]
    lang: String,

    /// Number of documents converted concurrently.
    #[arg(short = 'j', long, env = "MARKPACK_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Print the per-document outcome report as JSON to stdout.
    #[arg(long, env = "MARKPACK_JSON")]
    json: bool,

    /// Print page/image counts only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MARKPACK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MARKPACK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MARKPACK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Collect input files ──────────────────────────────────────────────
    let files = collect_input_files(&cli.inputs).await?;
    if files.is_empty() {
        bail!("no PDF files found in the given inputs");
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = ConversionConfig::default();
        for path in &files {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let summary = inspect(bytes, &config)
                .await
                .with_context(|| format!("failed to inspect {}", path.display()))?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": path.display().to_string(),
                        "pages": summary.page_count,
                        "images": summary.image_count,
                    })
                );
            } else {
                println!(
                    "{}:  {} pages, {} embedded images",
                    path.display(),
                    summary.page_count,
                    summary.image_count
                );
            }
        }
        return Ok(());
    }

    if !cli.quiet && !TesseractEngine::is_available() {
        eprintln!(
            "{} tesseract not found on PATH — image OCR will emit warning lines \
             (install tesseract-ocr)",
            yellow("⚠")
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .ocr_language(&cli.lang)
        .concurrency(cli.concurrency);
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }
    let config = builder.build().context("invalid configuration")?;

    // ── Read inputs ──────────────────────────────────────────────────────
    let mut inputs = Vec::with_capacity(files.len());
    for path in &files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        inputs.push(BatchInput::new(name, bytes));
    }
    let total = inputs.len();

    // ── Run the batch ────────────────────────────────────────────────────
    let outcomes = package_to_file(inputs, &cli.output, &config)
        .await
        .context("batch packaging failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcomes).context("failed to serialise outcomes")?
        );
    } else if !show_progress && !cli.quiet {
        // The progress callback already printed per-file lines otherwise.
        for outcome in &outcomes {
            match &outcome.status {
                ItemStatus::Packaged { entry_name, .. } => {
                    eprintln!("  {} {}  →  {}", green("✓"), outcome.name, entry_name);
                }
                ItemStatus::Failed { message } => {
                    eprintln!("  {} {}  {}", red("✗"), outcome.name, red(message));
                }
            }
        }
    }

    let packaged = outcomes.iter().filter(|o| o.is_packaged()).count();
    if !cli.quiet {
        eprintln!(
            "{} {}/{} documents  →  {}",
            if packaged == total { green("✔") } else { yellow("⚠") },
            packaged,
            total,
            bold(&cli.output.display().to_string()),
        );
    }

    if packaged == 0 {
        bail!("all {total} documents failed to convert");
    }
    Ok(())
}

/// Expand the CLI inputs into a flat list of PDF files.
///
/// Directories contribute their `*.pdf` members (non-recursive, sorted);
/// files are taken as-is so a non-`.pdf` extension can still be attempted.
async fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut members = Vec::new();
            let mut entries = tokio::fs::read_dir(input)
                .await
                .with_context(|| format!("failed to read directory {}", input.display()))?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let is_pdf = path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false);
                if path.is_file() && is_pdf {
                    members.push(path);
                }
            }
            members.sort();
            files.extend(members);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("input not found: {}", input.display());
        }
    }
    Ok(files)
}
