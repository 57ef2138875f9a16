//! Cancellation at source boundaries.

use pdfbind::bind::BinderFactory;
use pdfbind::model::TargetDescriptor;
use std::fs;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::common::{leftover_staging_files, page_widths, pdf, sources};

#[test]
fn test_cancel_before_start_leaves_no_target() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let b = pdf(dir.path(), "b.pdf", &[2]);
    let target = dir.path().join("out.pdf");

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = BinderFactory::new()
        .orchestrator(sources(&[&a, &b]), TargetDescriptor::new(&target))
        .run(&cancel, |_| {})
        .unwrap();

    assert!(result.cancelled);
    assert!(result.appended.is_empty());
    assert!(result.skipped.is_empty());
    assert!(!target.exists());
    assert_eq!(leftover_staging_files(dir.path()), 0);
}

#[test]
fn test_cancel_before_start_keeps_existing_target() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let target = dir.path().join("out.pdf");
    fs::write(&target, b"previous output").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = BinderFactory::new()
        .orchestrator(sources(&[&a]), TargetDescriptor::new(&target))
        .run(&cancel, |_| {})
        .unwrap();

    assert!(result.cancelled);
    assert_eq!(fs::read(&target).unwrap(), b"previous output");
}

#[test]
fn test_cancel_after_first_source() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let b = pdf(dir.path(), "b.pdf", &[2]);
    let target = dir.path().join("out.pdf");
    fs::write(&target, b"previous output").unwrap();

    let cancel = CancellationToken::new();
    let mut events = 0;
    let result = BinderFactory::new()
        .orchestrator(sources(&[&a, &b]), TargetDescriptor::new(&target))
        .run(&cancel, |_| {
            events += 1;
            cancel.cancel();
        })
        .unwrap();

    assert_eq!(events, 1);
    assert!(result.cancelled);
    assert_eq!(result.appended_paths(), vec![a.as_path()]);
    assert!(result.skipped.is_empty());
    assert_eq!(fs::read(&target).unwrap(), b"previous output");
    assert_eq!(leftover_staging_files(dir.path()), 0);
}

#[tokio::test]
async fn test_cancel_after_last_source_still_commits() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let b = pdf(dir.path(), "b.pdf", &[2]);
    let target = dir.path().join("out.pdf");

    let mut handle = BinderFactory::new()
        .orchestrator(sources(&[&a, &b]), TargetDescriptor::new(&target))
        .spawn();

    let mut last = None;
    while let Some(progress) = handle.next_progress().await {
        last = Some(progress);
    }
    // Every source has been processed; nothing checks the token any more.
    handle.cancel();

    let result = handle.wait().await.unwrap();
    assert_eq!(last.unwrap().completed_count, 2);
    assert!(!result.cancelled);
    assert_eq!(page_widths(&target), vec![1, 2]);
}

#[tokio::test]
async fn test_dropping_handle_cancels() {
    let dir = TempDir::new().unwrap();
    let a = pdf(dir.path(), "a.pdf", &[1]);
    let target = dir.path().join("out.pdf");

    let token = CancellationToken::new();
    let handle = BinderFactory::new()
        .orchestrator(sources(&[&a]), TargetDescriptor::new(&target))
        .spawn_with_token(token.clone());
    drop(handle);

    assert!(token.is_cancelled());
}
