//! PDF Merge
//!
//! Combines multiple PDFs into a single document, in input order.

use crate::engine::{DocumentEngine, SaveOptions};
use crate::error::Result;
use crate::upload::InputFile;
use tracing::debug;

/// Copy every page of every file, in order, into a fresh document
///
/// Fails fast: the first file that cannot be loaded or copied aborts the
/// merge, and the error names that file.
pub fn merge_documents<E: DocumentEngine>(engine: &E, files: &[InputFile]) -> Result<Vec<u8>> {
    let mut merged = engine.create()?;

    for file in files {
        let source = engine.load(&file.bytes).map_err(|e| e.in_file(&file.name))?;
        let count = engine.page_count(&source);
        let pages: Vec<u32> = (0..count).collect();

        engine
            .copy_pages(&mut merged, &source, &pages)
            .map_err(|e| e.in_file(&file.name))?;
        debug!(file = %file.name, pages = count, "merged file");
    }

    engine.save(merged, SaveOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfToolsError;
    use crate::lopdf_engine::LopdfEngine;
    use crate::testutil::{create_test_pdf, fake_pdf, page_texts, parse_fake, FakeEngine};
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_preserves_file_order() {
        let files = vec![
            InputFile::new("a.pdf", fake_pdf("A", 2)),
            InputFile::new("b.pdf", fake_pdf("B", 1)),
            InputFile::new("c.pdf", fake_pdf("C", 2)),
        ];

        let out = merge_documents(&FakeEngine, &files).unwrap();
        assert_eq!(parse_fake(&out).labels(), vec!["A1", "A2", "B1", "C1", "C2"]);
    }

    #[test]
    fn test_merge_fails_fast_naming_file() {
        let files = vec![
            InputFile::new("good.pdf", fake_pdf("A", 1)),
            InputFile::new("broken.pdf", b"garbage".to_vec()),
            InputFile::new("never.pdf", fake_pdf("C", 1)),
        ];

        let err = merge_documents(&FakeEngine, &files).unwrap_err();
        match err {
            PdfToolsError::FileFailed { file, .. } => assert_eq!(file, "broken.pdf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_two_real_documents_combines_pages() {
        let files = vec![
            InputFile::new("a.pdf", create_test_pdf(2, "DocA")),
            InputFile::new("b.pdf", create_test_pdf(3, "DocB")),
        ];

        let merged = merge_documents(&LopdfEngine, &files).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 5);

        let first_lines: Vec<String> = page_texts(&merged)
            .into_iter()
            .map(|page| page[0].clone())
            .collect();
        assert_eq!(
            first_lines,
            vec![
                "DocA-Page-1",
                "DocA-Page-2",
                "DocB-Page-1",
                "DocB-Page-2",
                "DocB-Page-3"
            ]
        );
    }

    #[test]
    fn test_merge_handles_different_sizes() {
        let files = vec![
            InputFile::new("large.pdf", create_test_pdf(10, "Large")),
            InputFile::new("small.pdf", create_test_pdf(1, "Small")),
            InputFile::new("medium.pdf", create_test_pdf(5, "Medium")),
        ];

        let merged = merge_documents(&LopdfEngine, &files).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 16);
    }

    #[test]
    fn test_merge_invalid_real_pdf_names_file() {
        let files = vec![
            InputFile::new("ok.pdf", create_test_pdf(1, "Ok")),
            InputFile::new("bad.pdf", b"%PDF-1.7 truncated".to_vec()),
        ];

        let err = merge_documents(&LopdfEngine, &files).unwrap_err();
        assert!(err.to_string().starts_with("bad.pdf could not be processed"));
    }
}
