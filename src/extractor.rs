//! Per-page text extraction from PDF using lopdf

use crate::pages::{default_selection, parse_page_numbers, PagedContent};
use crate::WorkbenchError;
use lopdf::Document;
use std::path::Path;

use log::debug;

/// Number of pages, read from metadata only
pub fn page_count<P: AsRef<Path>>(path: P) -> Result<u32, WorkbenchError> {
    Ok(Document::load_metadata(path)?.page_count)
}

/// Number of pages of a PDF held in memory, read from metadata only
pub fn page_count_mem(buffer: &[u8]) -> Result<u32, WorkbenchError> {
    Ok(Document::load_metadata_mem(buffer)?.page_count)
}

/// Extract the pages named by `selection` (e.g. `"1, 3-5"`) from a PDF file.
///
/// A blank selection means every page.
pub fn extract_pages<P: AsRef<Path>>(
    path: P,
    selection: &str,
) -> Result<PagedContent, WorkbenchError> {
    let doc = Document::load(path)?;
    extract_pages_from_doc(&doc, selection)
}

/// Extract the pages named by `selection` from a PDF memory buffer
pub fn extract_pages_mem(buffer: &[u8], selection: &str) -> Result<PagedContent, WorkbenchError> {
    let doc = Document::load_mem(buffer)?;
    extract_pages_from_doc(&doc, selection)
}

/// Extract selected pages from a loaded document
fn extract_pages_from_doc(doc: &Document, selection: &str) -> Result<PagedContent, WorkbenchError> {
    let pages = doc.get_pages();
    let total_pages = pages.len() as u32;

    let selection = if selection.trim().is_empty() {
        default_selection(total_pages)
    } else {
        selection.to_string()
    };

    let requested: Vec<u32> = parse_page_numbers(&selection, Some(total_pages))
        .into_iter()
        .filter(|page| pages.contains_key(page))
        .collect();
    if requested.is_empty() {
        return Err(WorkbenchError::NoPagesSelected(selection));
    }

    let mut content = PagedContent::new();
    for page in requested {
        let text = doc.extract_text(&[page])?;
        debug!("page {}: {} bytes of text", page, text.len());
        content.insert(page, text);
    }

    if content.iter().all(|(_, text)| text.trim().is_empty()) {
        return Err(WorkbenchError::NoText);
    }

    Ok(content)
}
