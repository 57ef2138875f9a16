//! End-to-end bind operations over generated sources.

use pdfbind::bind::BinderFactory;
use pdfbind::config::{BindOptions, CompressionLevel};
use pdfbind::model::{SourceState, TargetDescriptor};
use std::fs;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::common::{
    junk, leftover_staging_files, page_widths, password_pdf, pdf, protected_pdf, sources,
};

#[test]
fn test_ok_protected_ok() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[101, 102]);
    let b = protected_pdf(dir.path(), "b.pdf");
    let c = pdf(dir.path(), "c.pdf", &[301]);
    let target = dir.path().join("t.pdf");

    let result = BinderFactory::new()
        .orchestrator(sources(&[&a, &b, &c]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert!(!result.cancelled);
    assert_eq!(result.appended_paths(), vec![a.as_path(), c.as_path()]);
    assert_eq!(result.skipped_paths(), vec![b.as_path()]);
    assert_eq!(result.skipped[0].state, SourceState::Protected);
    assert_eq!(page_widths(&target), vec![101, 102, 301]);
}

#[test]
fn test_encrypted_sources_bind_only_without_user_password() {
    let dir = TempDir::new().unwrap();
    let open = password_pdf(dir.path(), "owner-only.pdf", &[401, 402], "");
    let locked = password_pdf(dir.path(), "locked.pdf", &[501], "secret");
    let plain = pdf(dir.path(), "plain.pdf", &[601]);
    let target = dir.path().join("out.pdf");

    let result = BinderFactory::new()
        .orchestrator(
            sources(&[&open, &locked, &plain]),
            TargetDescriptor::new(&target),
        )
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(result.appended_paths(), vec![open.as_path(), plain.as_path()]);
    assert_eq!(result.skipped_paths(), vec![locked.as_path()]);
    assert_eq!(result.skipped[0].state, SourceState::Protected);
    assert_eq!(page_widths(&target), vec![401, 402, 601]);

    let output = lopdf::Document::load(&target).unwrap();
    assert!(!output.is_encrypted());
}

#[test]
fn test_every_failure_kind_is_skipped() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.pdf");
    let unreadable = junk(dir.path(), "notes.pdf");
    let protected = protected_pdf(dir.path(), "secret.pdf");
    let good = pdf(dir.path(), "good.pdf", &[500]);
    let target = dir.path().join("out.pdf");

    let result = BinderFactory::new()
        .orchestrator(
            sources(&[&missing, &unreadable, &good, &protected]),
            TargetDescriptor::new(&target),
        )
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    let states: Vec<_> = result.skipped.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![SourceState::Missing, SourceState::Unreadable, SourceState::Protected]
    );
    assert!(result.skipped.iter().all(|s| s.reason.is_some()));
    assert_eq!(result.appended_paths(), vec![good.as_path()]);
    assert_eq!(page_widths(&target), vec![500]);
}

#[test]
fn test_no_source_in_both_lists() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let b = junk(dir.path(), "b.pdf");
    let target = dir.path().join("out.pdf");

    let result = BinderFactory::new()
        .orchestrator(sources(&[&a, &b, &a]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    for skipped in &result.skipped {
        assert!(skipped.state != SourceState::Ok);
        assert!(!result.appended.contains(skipped));
    }
    assert!(result.appended.iter().all(|s| s.state == SourceState::Ok));
    assert_eq!(result.appended.len() + result.skipped.len(), 3);
}

#[test]
fn test_all_sources_unusable_still_writes_empty_document() {
    let dir = TempDir::new().unwrap();
    let bad = junk(dir.path(), "bad.pdf");
    let target = dir.path().join("out.pdf");

    let result = BinderFactory::new()
        .orchestrator(sources(&[&bad]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert!(!result.cancelled);
    assert!(result.appended.is_empty());
    assert_eq!(result.total_pages, 0);
    assert!(page_widths(&target).is_empty());
}

#[test]
fn test_zero_sources() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out.pdf");

    let result = BinderFactory::new()
        .orchestrator(Vec::new(), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert!(result.appended.is_empty());
    assert!(result.skipped.is_empty());
    assert!(target.exists());
    assert!(page_widths(&target).is_empty());
}

#[test]
fn test_rerun_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[11, 12]);
    let b = pdf(dir.path(), "b.pdf", &[21]);
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");

    let factory = BinderFactory::new();
    let r1 = factory
        .orchestrator(sources(&[&a, &b]), TargetDescriptor::new(&first))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();
    let r2 = factory
        .orchestrator(sources(&[&a, &b]), TargetDescriptor::new(&second))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(r1.appended, r2.appended);
    assert_eq!(r1.skipped, r2.skipped);
    assert_eq!(page_widths(&first), page_widths(&second));
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_existing_target_is_replaced_atomically() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[42]);
    let target = dir.path().join("out.pdf");
    fs::write(&target, b"old contents").unwrap();

    BinderFactory::new()
        .orchestrator(sources(&[&a]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(page_widths(&target), vec![42]);
    assert_eq!(leftover_staging_files(dir.path()), 0);
}

#[test]
fn test_compression_levels_keep_content() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[10, 20]);

    for (name, compression) in [
        ("none.pdf", CompressionLevel::None),
        ("standard.pdf", CompressionLevel::Standard),
        ("maximum.pdf", CompressionLevel::Maximum),
    ] {
        let target = dir.path().join(name);
        let options = BindOptions {
            compression,
            ..BindOptions::default()
        };

        BinderFactory::with_options(options)
            .orchestrator(sources(&[&a, &a]), TargetDescriptor::new(&target))
            .run(&CancellationToken::new(), |_| {})
            .unwrap();

        assert_eq!(page_widths(&target), vec![10, 20, 10, 20], "{name}");
    }
}

#[test]
fn test_progress_matches_processing_order() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let b = junk(dir.path(), "b.pdf");
    let c = pdf(dir.path(), "c.pdf", &[3]);
    let target = dir.path().join("out.pdf");

    let mut events = Vec::new();
    BinderFactory::new()
        .orchestrator(sources(&[&a, &b, &c]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |p| events.push(p))
        .unwrap();

    let seen: Vec<_> = events
        .iter()
        .map(|p| (p.completed_count, p.current_source.clone().unwrap()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (1, "a.pdf".to_string()),
            (2, "b.pdf".to_string()),
            (3, "c.pdf".to_string())
        ]
    );
    assert_eq!(events.last().unwrap().fraction(), 1.0);
}

#[test]
fn test_target_in_missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let target = dir.path().join("nowhere").join("out.pdf");

    let err = BinderFactory::new()
        .orchestrator(sources(&[&a]), TargetDescriptor::new(&target))
        .run(&CancellationToken::new(), |_| {})
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(err.exit_code(), 5);
    assert!(!target.exists());
}
