//! Batch-level packaging properties: per-item isolation, entry naming,
//! archive round-trips.

mod common;

use common::{EchoOcrEngine, FixturePage, FixtureSource};
use markpack::{
    convert_sync, package, BatchInput, ConversionConfig, ItemStatus, PackageProgressCallback,
};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn three_document_source() -> FixtureSource {
    FixtureSource::new()
        .document(b"doc-a", vec![FixturePage::text("Alpha pages")])
        .document(
            b"doc-b",
            vec![FixturePage::text("Bravo").with_image(b"Stamp 42")],
        )
        .document(b"doc-c", vec![FixturePage::text("Charlie")])
}

fn config_with(source: FixtureSource) -> ConversionConfig {
    ConversionConfig::builder()
        .source(Arc::new(source))
        .engine(Arc::new(EchoOcrEngine))
        .build()
        .unwrap()
}

fn entry_names(archive: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn read_entry(archive: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    String::from_utf8(buf).expect("archive entry must be valid UTF-8")
}

#[tokio::test]
async fn batch_of_three_valid_inputs_packages_all() {
    let inputs = vec![
        BatchInput::new("a.pdf", b"doc-a".to_vec()),
        BatchInput::new("b.pdf", b"doc-b".to_vec()),
        BatchInput::new("c.pdf", b"doc-c".to_vec()),
    ];
    let output = package(inputs, &config_with(three_document_source()))
        .await
        .unwrap();

    assert_eq!(output.packaged_count(), 3);
    assert_eq!(output.failed_count(), 0);

    let mut names = entry_names(&output.archive);
    names.sort();
    assert_eq!(names, ["a.md", "b.md", "c.md"]);
}

#[tokio::test]
async fn one_corrupt_input_fails_alone() {
    let inputs = vec![
        BatchInput::new("a.pdf", b"doc-a".to_vec()),
        BatchInput::new("broken.pdf", b"not a pdf at all".to_vec()),
        BatchInput::new("c.pdf", b"doc-c".to_vec()),
    ];
    let output = package(inputs, &config_with(three_document_source()))
        .await
        .unwrap();

    assert_eq!(output.outcomes.len(), 3);
    assert_eq!(output.packaged_count(), 2);
    assert_eq!(entry_names(&output.archive).len(), 2);

    // Outcomes keep input order; exactly one failure, naming the corrupt
    // input and carrying a message.
    let names: Vec<&str> = output.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["a.pdf", "broken.pdf", "c.pdf"]);
    match &output.outcomes[1].status {
        ItemStatus::Failed { message } => assert!(message.contains("not a valid PDF")),
        other => panic!("expected failure outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn archive_entries_round_trip_to_conversion_output() {
    let inputs = vec![
        BatchInput::new("a.pdf", b"doc-a".to_vec()),
        BatchInput::new("b.pdf", b"doc-b".to_vec()),
    ];
    let config = config_with(three_document_source());
    let output = package(inputs, &config).await.unwrap();

    for (name, bytes) in [("a.md", b"doc-a" as &[u8]), ("b.md", b"doc-b")] {
        let entry = read_entry(&output.archive, name);
        let direct = convert_sync(bytes, &config).unwrap();
        assert_eq!(entry, direct.markdown, "entry {name} diverged");
    }
}

#[tokio::test]
async fn all_failures_still_yield_valid_empty_archive() {
    let inputs = vec![
        BatchInput::new("x.pdf", b"junk-1".to_vec()),
        BatchInput::new("y.pdf", b"junk-2".to_vec()),
    ];
    let output = package(inputs, &config_with(FixtureSource::new()))
        .await
        .unwrap();

    assert_eq!(output.packaged_count(), 0);
    assert_eq!(output.failed_count(), 2);
    assert!(entry_names(&output.archive).is_empty());
}

#[tokio::test]
async fn colliding_names_get_deterministic_suffixes() {
    let inputs = vec![
        BatchInput::new("report.pdf", b"doc-a".to_vec()),
        BatchInput::new("report.PDF", b"doc-c".to_vec()),
    ];
    let output = package(inputs, &config_with(three_document_source()))
        .await
        .unwrap();

    assert_eq!(entry_names(&output.archive), ["report.md", "report-2.md"]);
    match &output.outcomes[1].status {
        ItemStatus::Packaged { entry_name, .. } => assert_eq!(entry_name, "report-2.md"),
        other => panic!("expected packaged outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_batches_keep_input_order() {
    let source = three_document_source();
    let config = ConversionConfig::builder()
        .source(Arc::new(source))
        .engine(Arc::new(EchoOcrEngine))
        .concurrency(4)
        .build()
        .unwrap();

    let inputs = vec![
        BatchInput::new("a.pdf", b"doc-a".to_vec()),
        BatchInput::new("b.pdf", b"doc-b".to_vec()),
        BatchInput::new("c.pdf", b"doc-c".to_vec()),
    ];
    let output = package(inputs, &config).await.unwrap();

    let names: Vec<&str> = output.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(output.packaged_count(), 3);
}

#[tokio::test]
async fn progress_callback_sees_every_item() {
    struct Counting {
        items: AtomicUsize,
        errors: AtomicUsize,
        packaged: AtomicUsize,
    }
    impl PackageProgressCallback for Counting {
        fn on_item_complete(&self, _i: usize, _t: usize, _n: &str, _len: usize) {
            self.items.fetch_add(1, Ordering::SeqCst);
        }
        fn on_item_error(&self, _i: usize, _t: usize, _n: &str, _e: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_batch_complete(&self, _total: usize, packaged: usize) {
            self.packaged.store(packaged, Ordering::SeqCst);
        }
    }

    let counting = Arc::new(Counting {
        items: AtomicUsize::new(0),
        errors: AtomicUsize::new(0),
        packaged: AtomicUsize::new(0),
    });
    let config = ConversionConfig::builder()
        .source(Arc::new(three_document_source()))
        .engine(Arc::new(EchoOcrEngine))
        .progress_callback(counting.clone())
        .build()
        .unwrap();

    let inputs = vec![
        BatchInput::new("a.pdf", b"doc-a".to_vec()),
        BatchInput::new("bad.pdf", b"garbage".to_vec()),
    ];
    package(inputs, &config).await.unwrap();

    assert_eq!(counting.items.load(Ordering::SeqCst), 1);
    assert_eq!(counting.errors.load(Ordering::SeqCst), 1);
    assert_eq!(counting.packaged.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_input_list_packages_nothing() {
    let output = package(Vec::new(), &config_with(FixtureSource::new()))
        .await
        .unwrap();
    assert!(output.outcomes.is_empty());
    assert!(entry_names(&output.archive).is_empty());
}
