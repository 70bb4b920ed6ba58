//! Page selection parsing
//!
//! Two parsers live here and they deliberately disagree on strictness:
//! - `parse_page_range` (split) rejects any token it cannot honor.
//! - `pages_to_keep` (page deletion) skips tokens it cannot read.

use crate::error::{PdfToolsError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Zero-based page indices, strictly increasing, all below the page count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSelection(Vec<u32>);

impl PageSelection {
    /// Every page of a document with `page_count` pages
    pub fn all(page_count: u32) -> Self {
        Self((0..page_count).collect())
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }

    fn from_set(set: BTreeSet<u32>) -> Self {
        Self(set.into_iter().collect())
    }
}

/// Parse a page range string like "1-3, 5, 8-10" against a known page count
///
/// Input pages are 1-based; the selection is 0-based. Blank input selects
/// every page.
pub fn parse_page_range(input: &str, page_count: u32) -> Result<PageSelection> {
    if input.trim().is_empty() {
        return non_empty(PageSelection::all(page_count), page_count);
    }

    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let invalid = || PdfToolsError::InvalidRange {
                token: part.to_string(),
                page_count,
            };
            let start: u32 = start.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end.trim().parse().map_err(|_| invalid())?;

            if start < 1 || start > end || end > page_count {
                return Err(invalid());
            }

            pages.extend(start - 1..end);
        } else {
            let invalid = || PdfToolsError::InvalidPageNumber {
                token: part.to_string(),
                page_count,
            };
            let page: u32 = part.parse().map_err(|_| invalid())?;

            if page < 1 || page > page_count {
                return Err(invalid());
            }

            pages.insert(page - 1);
        }
    }

    non_empty(PageSelection::from_set(pages), page_count)
}

/// Compute the pages that survive deleting `input` ("2, 4, 7-9") from the document
pub fn pages_to_keep(input: &str, page_count: u32) -> Result<PageSelection> {
    let mut removed = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let parsed = match part.split_once('-') {
            Some((start, end)) => start
                .trim()
                .parse::<u32>()
                .ok()
                .zip(end.trim().parse::<u32>().ok()),
            None => part.parse::<u32>().ok().map(|page| (page, page)),
        };

        match parsed {
            Some((start, end)) if start >= 1 && start <= end => {
                removed.extend(start..=end.min(page_count));
            }
            _ => warn!(token = part, "ignoring unreadable page to delete"),
        }
    }

    let keep: BTreeSet<u32> = (1..=page_count)
        .filter(|page| !removed.contains(page))
        .map(|page| page - 1)
        .collect();

    if keep.is_empty() {
        return Err(PdfToolsError::AllPagesRemoved);
    }

    Ok(PageSelection::from_set(keep))
}

fn non_empty(selection: PageSelection, page_count: u32) -> Result<PageSelection> {
    if selection.is_empty() {
        Err(PdfToolsError::EmptySelection { page_count })
    } else {
        Ok(selection)
    }
}
