//! `DocumentEngine` backed by lopdf
//!
//! Page copying imports the whole source object graph with remapped IDs,
//! re-parents the chosen pages under the destination page tree, and leaves
//! unreachable leftovers for `prune_objects` at save time.

use crate::engine::{
    CompressionLevel, DocumentEngine, PageSize, Placement, SaveOptions, StandardFont, TextRun,
};
use crate::error::{PdfToolsError, Result};
use crate::raster::{ColorSpace, ImageData, RasterImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

/// Font registered in a document, referenced by resource name on each page
#[derive(Debug, Clone)]
pub struct LopdfFont {
    resource: String,
    id: ObjectId,
}

/// Image XObject registered in a document
#[derive(Debug, Clone)]
pub struct LopdfImage {
    resource: String,
    id: ObjectId,
}

impl DocumentEngine for LopdfEngine {
    type Document = Document;
    type Font = LopdfFont;
    type Image = LopdfImage;

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PdfToolsError::Processing(format!("Failed to parse PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(PdfToolsError::Processing(
                "Encrypted documents are not supported".into(),
            ));
        }

        Ok(doc)
    }

    fn create(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(Vec::new())),
            ("Count", Object::Integer(0)),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Ok(doc)
    }

    fn page_count(&self, doc: &Document) -> u32 {
        doc.get_pages().len() as u32
    }

    fn page_size(&self, doc: &Document, page: u32) -> Result<PageSize> {
        let page_id = page_id(doc, page)?;

        let media_box = inherited_attribute(doc, page_id, b"MediaBox")
            .and_then(|obj| match obj {
                Object::Array(values) => Some(values),
                _ => None,
            })
            .filter(|values| values.len() == 4)
            .and_then(|values| values.iter().map(as_number).collect::<Option<Vec<f32>>>());

        Ok(match media_box {
            Some(b) => PageSize {
                width: (b[2] - b[0]).abs(),
                height: (b[3] - b[1]).abs(),
            },
            None => PageSize::A4,
        })
    }

    fn copy_pages(&self, dest: &mut Document, source: &Document, pages: &[u32]) -> Result<()> {
        let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();

        let mut chosen = Vec::with_capacity(pages.len());
        for &page in pages {
            let id = source_pages.get(page as usize).copied().ok_or_else(|| {
                PdfToolsError::Processing(format!(
                    "Page {} does not exist (document has {} pages)",
                    page + 1,
                    source_pages.len()
                ))
            })?;
            chosen.push(id);
        }

        // Inherited attributes must be captured before the page leaves its tree
        let inherited: Vec<Vec<(&[u8], Object)>> = chosen
            .iter()
            .map(|&id| {
                let own = source.get_dictionary(id).ok();
                INHERITABLE
                    .iter()
                    .filter(|key| !own.is_some_and(|dict| dict.has(key)))
                    .filter_map(|key| inherited_attribute(source, id, key).map(|v| (*key, v)))
                    .collect()
            })
            .collect();

        let offset = dest.max_id;
        for (id, object) in source.objects.iter() {
            let mut object = object.clone();
            remap_refs(&mut object, offset);
            dest.objects.insert((id.0 + offset, id.1), object);
        }
        dest.max_id = dest.max_id.max(source.max_id + offset);

        let pages_id = pages_root(dest)?;
        let mut kids = Vec::with_capacity(chosen.len());

        for (page_id, attributes) in chosen.into_iter().zip(inherited) {
            let new_id = (page_id.0 + offset, page_id.1);
            let page = dest
                .get_object_mut(new_id)
                .and_then(Object::as_dict_mut)
                .map_err(|_| PdfToolsError::Processing("Invalid page dictionary".into()))?;

            page.set("Parent", Object::Reference(pages_id));
            for (key, mut value) in attributes {
                remap_refs(&mut value, offset);
                page.set(key, value);
            }
            kids.push(Object::Reference(new_id));
        }

        debug!(count = kids.len(), offset, "copied pages");
        append_kids(dest, kids)
    }

    fn add_page(&self, doc: &mut Document, size: PageSize) -> Result<u32> {
        let pages_id = pages_root(doc)?;

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(size.width),
                    Object::Real(size.height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ]);
        let page_id = doc.add_object(page);

        append_kids(doc, vec![Object::Reference(page_id)])?;
        Ok(self.page_count(doc) - 1)
    }

    fn embed_font(&self, doc: &mut Document, font: StandardFont) -> Result<LopdfFont> {
        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]);
        let id = doc.add_object(dict);

        Ok(LopdfFont {
            resource: format!("PTF{}", id.0),
            id,
        })
    }

    fn embed_image(&self, doc: &mut Document, image: &RasterImage) -> Result<LopdfImage> {
        let mut dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(image.width as i64)),
            ("Height", Object::Integer(image.height as i64)),
            (
                "ColorSpace",
                Object::Name(image.color_space.pdf_name().as_bytes().to_vec()),
            ),
            ("BitsPerComponent", Object::Integer(8)),
        ]);

        let content = match &image.data {
            ImageData::Jpeg { bytes, adobe } => {
                dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
                if *adobe && image.color_space == ColorSpace::Cmyk {
                    let decode = [1, 0, 1, 0, 1, 0, 1, 0].map(Object::Integer);
                    dict.set("Decode", Object::Array(decode.to_vec()));
                }
                bytes.clone()
            }
            ImageData::Flate { samples, alpha } => {
                if let Some(alpha) = alpha {
                    let mask = Dictionary::from_iter(vec![
                        ("Type", Object::Name(b"XObject".to_vec())),
                        ("Subtype", Object::Name(b"Image".to_vec())),
                        ("Width", Object::Integer(image.width as i64)),
                        ("Height", Object::Integer(image.height as i64)),
                        ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
                        ("BitsPerComponent", Object::Integer(8)),
                        ("Filter", Object::Name(b"FlateDecode".to_vec())),
                    ]);
                    let mask_id =
                        doc.add_object(Stream::new(mask, alpha.clone()).with_compression(false));
                    dict.set("SMask", Object::Reference(mask_id));
                }
                dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
                samples.clone()
            }
        };

        let id = doc.add_object(Stream::new(dict, content).with_compression(false));

        Ok(LopdfImage {
            resource: format!("PTIm{}", id.0),
            id,
        })
    }

    fn draw_text(
        &self,
        doc: &mut Document,
        page: u32,
        font: &LopdfFont,
        run: &TextRun<'_>,
    ) -> Result<()> {
        let page_id = page_id(doc, page)?;
        add_resource(doc, page_id, b"Font", &font.resource, font.id)?;

        let color = run.color;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "rg",
                    vec![
                        Object::Real(color.0),
                        Object::Real(color.1),
                        Object::Real(color.2),
                    ],
                ),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font.resource.as_bytes().to_vec()),
                        Object::Real(run.size),
                    ],
                ),
                Operation::new("Td", vec![Object::Real(run.x), Object::Real(run.y)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_win_ansi(run.text),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };

        append_content(doc, page_id, content)
    }

    fn draw_image(
        &self,
        doc: &mut Document,
        page: u32,
        image: &LopdfImage,
        placement: Placement,
    ) -> Result<()> {
        let page_id = page_id(doc, page)?;
        add_resource(doc, page_id, b"XObject", &image.resource, image.id)?;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(placement.width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(placement.height),
                        Object::Real(placement.x),
                        Object::Real(placement.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image.resource.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };

        append_content(doc, page_id, content)
    }

    fn save(&self, mut doc: Document, options: SaveOptions) -> Result<Vec<u8>> {
        match options.level {
            CompressionLevel::Low => {}
            CompressionLevel::Medium => {
                doc.prune_objects();
            }
            CompressionLevel::High => {
                doc.prune_objects();
                doc.delete_zero_length_streams();
                doc.renumber_objects();
            }
        }
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfToolsError::Processing(format!("Save failed: {}", e)))?;

        debug!(level = %options.level, bytes = buffer.len(), "saved document");
        Ok(buffer)
    }
}

/// Object ID of the 0-based `page`
fn page_id(doc: &Document, page: u32) -> Result<ObjectId> {
    doc.get_pages().get(&(page + 1)).copied().ok_or_else(|| {
        PdfToolsError::Processing(format!(
            "Page {} does not exist (document has {} pages)",
            page + 1,
            doc.get_pages().len()
        ))
    })
}

/// Object ID of the page tree root
fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolsError::Processing("No Root in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolsError::Processing("No Pages in catalog".into()))
}

/// Append page references to the root of the page tree
fn append_kids(doc: &mut Document, new_kids: Vec<Object>) -> Result<()> {
    let pages_id = pages_root(doc)?;
    let pages = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfToolsError::Processing("Invalid pages dictionary".into()))?;

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0) + new_kids.len() as i64;
    let mut kids = match pages.get(b"Kids") {
        Ok(Object::Array(existing)) => existing.clone(),
        _ => Vec::new(),
    };
    kids.extend(new_kids);

    pages.set("Kids", Object::Array(kids));
    pages.set("Count", Object::Integer(count));
    Ok(())
}

/// Look up `key` on the page or the nearest ancestor that defines it, resolving references
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        let node = doc.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(match value {
                Object::Reference(target) => doc.get_object(*target).ok()?.clone(),
                other => other.clone(),
            });
        }

        depth += 1;
        if depth > 64 {
            return None;
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Register `target` as `/name` in the page's `category` resources
///
/// The page gets its own inline copy of whatever resources it inherited, so
/// pages that shared a resource dictionary are not affected.
fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    target: ObjectId,
) -> Result<()> {
    let mut resources = match inherited_attribute(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };

    let mut entries = match resources.get(category) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_default(),
        _ => Dictionary::new(),
    };
    entries.set(name, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfToolsError::Processing("Invalid page dictionary".into()))?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Add a content stream after the page's existing content
fn append_content(doc: &mut Document, page_id: ObjectId, content: Content) -> Result<()> {
    let bytes = content.encode()?;
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

    let existing = doc
        .get_dictionary(page_id)
        .map_err(|_| PdfToolsError::Processing("Invalid page dictionary".into()))?
        .get(b"Contents")
        .ok()
        .cloned();

    let mut contents = match existing {
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(Object::Array(items)) => items,
        _ => Vec::new(),
    };
    contents.push(Object::Reference(stream_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfToolsError::Processing("Invalid page dictionary".into()))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Shift every indirect reference inside `obj` by `offset`
fn remap_refs(obj: &mut Object, offset: u32) {
    match obj {
        Object::Reference(id) => id.0 += offset,
        Object::Array(items) => items.iter_mut().for_each(|item| remap_refs(item, offset)),
        Object::Dictionary(dict) => dict.iter_mut().for_each(|(_, v)| remap_refs(v, offset)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, v)| remap_refs(v, offset)),
        _ => {}
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Encode text for a standard font using WinAnsiEncoding
///
/// Latin-1 maps directly; a few common punctuation marks map to their
/// Windows-1252 slots; characters without a glyph fall back to an ASCII
/// look-alike or '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            'ğ' => b'g',
            'Ğ' => b'G',
            'ş' => b's',
            'Ş' => b'S',
            'ı' => b'i',
            'İ' => b'I',
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Rgb;
    use crate::raster::{self, RasterFormat};
    use crate::testutil::{
        create_adobe_cmyk_jpeg, create_test_jpeg, create_test_pdf, create_test_png, page_texts,
    };
    use pretty_assertions::assert_eq;

    fn reload(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    #[test]
    fn test_load_rejects_garbage() {
        let err = LopdfEngine.load(b"not a pdf").unwrap_err();
        assert!(err.to_string().contains("Failed to parse PDF"));
    }

    #[test]
    fn test_create_is_empty_and_saves() {
        let engine = LopdfEngine;
        let doc = engine.create().unwrap();
        assert_eq!(engine.page_count(&doc), 0);

        let bytes = engine.save(doc, SaveOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(reload(&bytes).get_pages().len(), 0);
    }

    #[test]
    fn test_copy_pages_in_requested_order() {
        let engine = LopdfEngine;
        let source = engine.load(&create_test_pdf(4, "Src")).unwrap();
        let mut dest = engine.create().unwrap();

        engine.copy_pages(&mut dest, &source, &[3, 0]).unwrap();
        let bytes = engine.save(dest, SaveOptions::default()).unwrap();

        let texts = page_texts(&bytes);
        assert_eq!(
            texts,
            vec![vec!["Src-Page-4".to_string()], vec!["Src-Page-1".to_string()]]
        );
    }

    #[test]
    fn test_copy_pages_from_two_sources_keeps_order() {
        let engine = LopdfEngine;
        let a = engine.load(&create_test_pdf(2, "A")).unwrap();
        let b = engine.load(&create_test_pdf(1, "B")).unwrap();
        let mut dest = engine.create().unwrap();

        engine.copy_pages(&mut dest, &a, &[0, 1]).unwrap();
        engine.copy_pages(&mut dest, &b, &[0]).unwrap();
        let bytes = engine.save(dest, SaveOptions::default()).unwrap();

        let first_lines: Vec<String> = page_texts(&bytes)
            .into_iter()
            .map(|page| page[0].clone())
            .collect();
        assert_eq!(first_lines, vec!["A-Page-1", "A-Page-2", "B-Page-1"]);
    }

    #[test]
    fn test_copied_page_inherits_media_box() {
        let engine = LopdfEngine;
        let source = engine.load(&create_test_pdf(1, "M")).unwrap();
        let mut dest = engine.create().unwrap();
        engine.copy_pages(&mut dest, &source, &[0]).unwrap();

        let size = engine.page_size(&dest, 0).unwrap();
        assert_eq!(
            size,
            PageSize {
                width: 612.0,
                height: 792.0
            }
        );
    }

    #[test]
    fn test_copy_missing_page_fails() {
        let engine = LopdfEngine;
        let source = engine.load(&create_test_pdf(2, "X")).unwrap();
        let mut dest = engine.create().unwrap();
        assert!(engine.copy_pages(&mut dest, &source, &[2]).is_err());
    }

    #[test]
    fn test_prune_drops_unselected_pages() {
        let engine = LopdfEngine;
        let source = engine.load(&create_test_pdf(6, "Big")).unwrap();
        let mut dest = engine.create().unwrap();
        engine.copy_pages(&mut dest, &source, &[0]).unwrap();

        let bytes = engine.save(dest, SaveOptions::default()).unwrap();
        let doc = reload(&bytes);
        assert_eq!(doc.get_pages().len(), 1);

        let contents: Vec<Vec<u8>> = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .map(|s| s.decompressed_content().unwrap_or_else(|_| s.content.clone()))
            .collect();
        let survives = |label: &str| {
            contents
                .iter()
                .any(|c| c.windows(label.len()).any(|w| w == label.as_bytes()))
        };
        assert!(survives("Big-Page-1"));
        for n in 2..=6 {
            let label = format!("Big-Page-{}", n);
            assert!(!survives(&label), "{} survived the prune", label);
        }
    }

    #[test]
    fn test_add_page_and_draw_text() {
        let engine = LopdfEngine;
        let mut doc = engine.create().unwrap();
        let page = engine.add_page(&mut doc, PageSize::A4).unwrap();
        assert_eq!(page, 0);

        let font = engine.embed_font(&mut doc, StandardFont::Helvetica).unwrap();
        let run = TextRun {
            text: "Hello",
            x: 50.0,
            y: 700.0,
            size: 12.0,
            color: Rgb::BLACK,
        };
        engine.draw_text(&mut doc, page, &font, &run).unwrap();

        let bytes = engine.save(doc, SaveOptions::default()).unwrap();
        assert_eq!(page_texts(&bytes), vec![vec!["Hello".to_string()]]);

        let doc = reload(&bytes);
        let size = engine.page_size(&doc, 0).unwrap();
        assert!((size.width - 595.28).abs() < 0.01);
    }

    #[test]
    fn test_draw_text_on_loaded_page_keeps_original_content() {
        let engine = LopdfEngine;
        let mut doc = engine.load(&create_test_pdf(2, "Form")).unwrap();
        let font = engine.embed_font(&mut doc, StandardFont::Helvetica).unwrap();
        let run = TextRun {
            text: "Name: Ada",
            x: 50.0,
            y: 600.0,
            size: 12.0,
            color: Rgb::BLACK,
        };
        engine.draw_text(&mut doc, 0, &font, &run).unwrap();

        let bytes = engine.save(doc, SaveOptions::default()).unwrap();
        let texts = page_texts(&bytes);
        assert_eq!(texts[0], vec!["Form-Page-1", "Name: Ada"]);
        assert_eq!(texts[1], vec!["Form-Page-2"]);
    }

    #[test]
    fn test_embed_and_draw_png_with_alpha() {
        let engine = LopdfEngine;
        let mut doc = engine.create().unwrap();
        let page = engine.add_page(&mut doc, PageSize::A4).unwrap();

        let png = create_test_png(3, 2, png::ColorType::Rgba);
        let raster = raster::decode(&png, RasterFormat::Png).unwrap();
        let image = engine.embed_image(&mut doc, &raster).unwrap();
        let placement = Placement {
            x: 10.0,
            y: 10.0,
            width: 30.0,
            height: 20.0,
        };
        engine.draw_image(&mut doc, page, &image, placement).unwrap();

        let bytes = engine.save(doc, SaveOptions::default()).unwrap();
        let doc = reload(&bytes);
        let has_smask = doc.objects.values().any(|obj| match obj {
            Object::Stream(s) => s.dict.has(b"SMask"),
            _ => false,
        });
        assert!(has_smask);
    }

    #[test]
    fn test_embed_jpeg_uses_dct() {
        let engine = LopdfEngine;
        let mut doc = engine.create().unwrap();
        let jpeg = create_test_jpeg(8, 8, 3);
        let raster = raster::decode(&jpeg, RasterFormat::Jpeg).unwrap();
        let image = engine.embed_image(&mut doc, &raster).unwrap();

        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert_eq!(
            stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
        assert_eq!(stream.content, jpeg);
        assert!(stream.dict.get(b"Decode").is_err());
    }

    #[test]
    fn test_embed_adobe_cmyk_jpeg_inverts_decode() {
        let engine = LopdfEngine;
        let mut doc = engine.create().unwrap();
        let jpeg = create_adobe_cmyk_jpeg(8, 8);
        let raster = raster::decode(&jpeg, RasterFormat::Jpeg).unwrap();
        let image = engine.embed_image(&mut doc, &raster).unwrap();

        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert_eq!(
            stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceCMYK"
        );
        let decode: Vec<i64> = stream
            .dict
            .get(b"Decode")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        assert_eq!(decode, vec![1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_save_levels_produce_valid_pdfs() {
        let engine = LopdfEngine;
        for level in [
            CompressionLevel::Low,
            CompressionLevel::Medium,
            CompressionLevel::High,
        ] {
            let doc = engine.load(&create_test_pdf(3, "C")).unwrap();
            let bytes = engine.save(doc, SaveOptions { level }).unwrap();
            assert_eq!(reload(&bytes).get_pages().len(), 3, "level {}", level);
        }
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("ş–€"), vec![b's', 0x96, 0x80]);
        assert_eq!(encode_win_ansi("中"), vec![b'?']);
    }
}
