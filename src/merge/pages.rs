//! Page tree manipulation.
//!
//! The output document owns a single root `Pages` node. Each appended
//! source contributes its whole page tree as one kid of that root, which
//! keeps the source's internal page order and any attributes its pages
//! inherit from their tree nodes.

use lopdf::{Document, Object, ObjectId, dictionary};

/// Create an empty, well-formed document: a catalog and an empty page tree.
///
/// Returns the document and the id of its root `Pages` node.
pub(crate) fn empty_document() -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => Object::Integer(0),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, pages_id)
}

/// Graft every page of `source` onto the end of `target`'s page tree.
///
/// `target` is only modified once every lookup on `source` has succeeded.
/// Returns the number of pages added.
pub(crate) fn graft(
    target: &mut Document,
    target_pages: ObjectId,
    mut source: Document,
) -> Result<usize, String> {
    // Move the source's ids past everything already in the target.
    source.renumber_objects_with(target.max_id + 1);

    let catalog_id = source
        .trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .map_err(|e| format!("missing document catalog: {e}"))?;
    let source_pages = root_pages_id(&source)?;
    let page_count = source.get_pages().len();

    match source.get_object_mut(source_pages) {
        Ok(Object::Dictionary(dict)) => {
            dict.set("Parent", target_pages);
        }
        _ => return Err("page tree root is not a dictionary".to_string()),
    }
    source.objects.remove(&catalog_id);

    let pages_dict = match target.get_object_mut(target_pages) {
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Err("output page tree is not a dictionary".to_string()),
    };
    match pages_dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            kids.push(Object::Reference(source_pages));
        }
        _ => return Err("output page tree has no Kids array".to_string()),
    }
    let current_count = pages_dict
        .get(b"Count")
        .and_then(|c| c.as_i64())
        .unwrap_or(0);
    pages_dict.set("Count", Object::Integer(current_count + page_count as i64));

    if source.version > target.version {
        target.version = source.version.clone();
    }
    target.max_id = target.max_id.max(source.max_id);
    target.objects.extend(source.objects);

    Ok(page_count)
}

/// Id of the root `Pages` node referenced by the catalog.
pub(crate) fn root_pages_id(doc: &Document) -> Result<ObjectId, String> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|pages| pages.as_reference())
        .map_err(|e| format!("missing page tree: {e}"))
}
