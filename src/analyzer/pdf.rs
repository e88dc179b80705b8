//! PDF analyzer backed by lopdf

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{CompressError, Result};
use crate::model::DocumentStats;

use super::DocumentAnalyzer;

/// Guard against malformed page trees with cyclic `/Parent` links
const MAX_PARENT_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfAnalyzer;

impl PdfAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentAnalyzer for PdfAnalyzer {
    fn analyze(&self, path: &Path) -> Result<DocumentStats> {
        let doc = Document::load(path).map_err(|e| CompressError::UnreadableDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let stats = analyze_document(&doc);
        log::debug!(
            "Analyzed {}: {} pages, {} chars, {} images",
            path.display(),
            stats.total_pages,
            stats.total_text_chars,
            stats.image_count
        );
        Ok(stats)
    }
}

/// Gather statistics from an already loaded document
pub fn analyze_document(doc: &Document) -> DocumentStats {
    let pages = doc.get_pages();
    let mut stats = DocumentStats {
        total_pages: pages.len(),
        ..Default::default()
    };

    for (&page_number, &page_id) in &pages {
        stats.total_text_chars += page_text_chars(doc, page_number);
        stats.image_count += page_image_count(doc, page_id);
    }

    stats
}

/// Characters of extracted text on one page
fn page_text_chars(doc: &Document, page_number: u32) -> usize {
    match doc.extract_text(&[page_number]) {
        Ok(text) => text.chars().count(),
        Err(e) => {
            log::warn!("Could not extract text from page {}: {}", page_number, e);
            0
        }
    }
}

/// Image XObjects reachable from one page, each counted once per page
fn page_image_count(doc: &Document, page_id: ObjectId) -> usize {
    let Some(resources) = page_resources(doc, page_id) else {
        return 0;
    };

    let mut seen = HashSet::new();
    count_images_in_resources(doc, resources, &mut seen)
}

/// Follow a reference to the object it points at
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object)? {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Page resources, inherited from the page tree when the page has none
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_object(page_id).ok()?.as_dict().ok()?;

    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve_dict(doc, resources);
        }
        node = resolve_dict(doc, node.get(b"Parent").ok()?)?;
    }

    None
}

fn count_images_in_resources(
    doc: &Document,
    resources: &Dictionary,
    seen: &mut HashSet<ObjectId>,
) -> usize {
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|x| resolve_dict(doc, x))
    else {
        return 0;
    };

    let mut count = 0;
    for (_, value) in xobjects.iter() {
        let Object::Reference(id) = value else {
            continue;
        };
        if !seen.insert(*id) {
            continue;
        }

        let Ok(Object::Stream(stream)) = doc.get_object(*id) else {
            continue;
        };

        match stream.dict.get(b"Subtype") {
            Ok(Object::Name(name)) if name == b"Image" => count += 1,
            Ok(Object::Name(name)) if name == b"Form" => {
                // Images drawn inside a form belong to the page that uses it
                if let Some(form_resources) = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|r| resolve_dict(doc, r))
                {
                    count += count_images_in_resources(doc, form_resources, seen);
                }
            }
            _ => {}
        }
    }

    count
}
