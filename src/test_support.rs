//! PDF fixtures generated at test time.
//!
//! Every page gets a distinct MediaBox width so tests can read the page
//! order of an output back as a list of widths.

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, dictionary};
use std::path::{Path, PathBuf};

/// Build a document with one page per entry of `widths`.
pub fn build_pdf(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

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
            Object::Reference(doc.add_object(page))
        })
        .collect();

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(widths.len() as i64),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a document with one page per entry of `widths` to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(widths);
    doc.save(&path).unwrap();
    path
}

/// Write a document whose trailer declares standard-handler encryption.
pub fn write_encrypted_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(&[612]);

    let encrypt = dictionary! {
        "Filter" => "Standard",
        "V" => Object::Integer(1),
        "R" => Object::Integer(2),
        "O" => Object::string_literal(vec![0x5Au8; 32]),
        "U" => Object::string_literal(vec![0xA5u8; 32]),
        "P" => Object::Integer(-4),
    };
    doc.trailer.set("Encrypt", Object::Dictionary(encrypt));
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![1u8; 16]),
            Object::string_literal(vec![1u8; 16]),
        ],
    );

    doc.save(&path).unwrap();
    path
}

/// Write a document encrypted by lopdf's standard security handler.
///
/// An empty `user_password` gives a file that opens without a credential.
pub fn write_password_pdf(dir: &Path, name: &str, widths: &[i64], user_password: &str) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(widths);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![3u8; 16]),
            Object::string_literal(vec![4u8; 16]),
        ],
    );

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    doc.save(&path).unwrap();
    path
}

/// Write arbitrary bytes to `dir/name`.
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// MediaBox widths of the pages of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_object(*id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}
