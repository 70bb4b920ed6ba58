//! Page extraction: split by range and delete pages
//!
//! Both build a new document from a whitelist of pages of the source.

use crate::engine::{DocumentEngine, SaveOptions};
use crate::error::Result;
use crate::ranges::{pages_to_keep, parse_page_range, PageSelection};
use tracing::debug;

/// Extract the pages named by `range` ("1-3, 5"); blank selects every page
pub fn split_document<E: DocumentEngine>(engine: &E, bytes: &[u8], range: &str) -> Result<Vec<u8>> {
    let source = engine.load(bytes)?;
    let selection = parse_page_range(range, engine.page_count(&source))?;
    extract(engine, &source, &selection)
}

/// Drop the pages listed in `pages` ("2, 4"); unreadable entries are ignored
pub fn delete_pages<E: DocumentEngine>(engine: &E, bytes: &[u8], pages: &str) -> Result<Vec<u8>> {
    let source = engine.load(bytes)?;
    let selection = pages_to_keep(pages, engine.page_count(&source))?;
    extract(engine, &source, &selection)
}

fn extract<E: DocumentEngine>(
    engine: &E,
    source: &E::Document,
    selection: &PageSelection,
) -> Result<Vec<u8>> {
    let mut out = engine.create()?;
    engine.copy_pages(&mut out, source, selection.indices())?;
    debug!(pages = selection.len(), "extracted pages");
    engine.save(out, SaveOptions::default())
}
