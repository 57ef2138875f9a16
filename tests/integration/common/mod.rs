//! Shared helpers for the integration tests.
//!
//! Fixtures are generated with lopdf. Every page gets a distinct MediaBox
//! width, so the page order of an output reads back as a list of widths.

#![allow(dead_code)]

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, dictionary};
use pdfbind::model::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Build a document with one page per entry of `widths`.
pub fn build_pdf(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            let page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(792),
                ],
            };
            doc.add_object(page).into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(widths.len() as i64),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a PDF with the given page widths to `dir/name`.
pub fn pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    build_pdf(widths).save(&path).expect("write fixture");
    path
}

/// Write a PDF whose trailer declares encryption.
pub fn protected_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(&[999]);
    doc.trailer.set(
        "Encrypt",
        dictionary! {
            "Filter" => "Standard",
            "V" => Object::Integer(1),
            "R" => Object::Integer(2),
            "O" => Object::string_literal(vec![0x11u8; 32]),
            "U" => Object::string_literal(vec![0x22u8; 32]),
            "P" => Object::Integer(-4),
        },
    );
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![7u8; 16]),
            Object::string_literal(vec![7u8; 16]),
        ],
    );
    doc.save(&path).expect("write fixture");
    path
}

/// Write a PDF encrypted with lopdf's standard security handler.
pub fn password_pdf(dir: &Path, name: &str, widths: &[i64], user_password: &str) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(widths);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![5u8; 16]),
            Object::string_literal(vec![6u8; 16]),
        ],
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("encryption state");
    doc.encrypt(&state).expect("encrypt fixture");
    doc.save(&path).expect("write fixture");
    path
}

/// Write a file that is not a PDF.
pub fn junk(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"this is not a document").expect("write fixture");
    path
}

/// Page widths of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("load output");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc
                .get_object(*id)
                .and_then(Object::as_dict)
                .expect("page dictionary");
            page.get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box")[2]
                .as_i64()
                .expect("width")
        })
        .collect()
}

/// Turn paths into sources, preserving order.
pub fn sources(paths: &[&PathBuf]) -> Vec<SourceFile> {
    paths.iter().map(|path| SourceFile::new(path.as_path())).collect()
}

/// Files in `dir` whose names start with the staging prefix.
pub fn leftover_staging_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".pdfbind-"))
        .count()
}
