//! Shared fixtures for unit tests

use crate::engine::{DocumentEngine, PageSize, Placement, SaveOptions, StandardFont, TextRun};
use crate::error::{PdfToolsError, Result};
use crate::raster::RasterImage;
use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};
use serde::{Deserialize, Serialize};

/// Create a simple PDF with N pages, each showing "{prefix}-Page-{n}"
pub fn create_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{}-Page-{}", prefix, i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        let page_id = doc.add_object(page);
        page_ids.push(page_id);
    }

    // MediaBox lives on the tree root so copied pages must pick it up by inheritance
    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Text of every `Tj` operator on each page of a PDF, in page order
pub fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_and_decode_page_content(page_id).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first())
                .filter_map(|operand| operand.as_str().ok())
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .collect()
        })
        .collect()
}

pub fn create_test_png(width: u32, height: u32, color: png::ColorType) -> Vec<u8> {
    let channels = match color {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => 1,
    };
    let pixels: Vec<u8> = (0..width * height * channels).map(|i| i as u8).collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&pixels).unwrap();
    }
    out
}

/// Minimal JPEG: SOI, an APP0 segment, a baseline SOF0 header, then EOI
pub fn create_test_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    out.extend_from_slice(b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00");
    push_frame(&mut out, width, height, components);
    out
}

/// CMYK JPEG with the Adobe APP14 segment Photoshop writes
pub fn create_adobe_cmyk_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xEE, 0x00, 0x0E]);
    out.extend_from_slice(b"Adobe\x00\x64\x00\x00\x00\x00\x00");
    push_frame(&mut out, width, height, 4);
    out
}

fn push_frame(out: &mut Vec<u8>, width: u16, height: u16, components: u8) {
    let sof_len = 8 + 3 * components as u16;
    out.extend_from_slice(&[0xFF, 0xC0]);
    out.extend_from_slice(&sof_len.to_be_bytes());
    out.push(8);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.push(components);
    for id in 1..=components {
        out.extend_from_slice(&[id, 0x11, 0]);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
}

/// In-memory engine whose documents are lists of labelled pages
///
/// `load` accepts `"{label}:{pages}"` (e.g. `"A:2"` gives pages A1, A2) and
/// `save` emits the document as JSON.
pub struct FakeEngine;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FakeDoc {
    pub pages: Vec<FakePage>,
    pub fonts: Vec<String>,
    pub images: usize,
    pub saved_with: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FakePage {
    pub label: String,
    pub size: PageSize,
    pub texts: Vec<(String, f32)>,
    pub images: Vec<(f32, f32, f32, f32)>,
}

impl FakeDoc {
    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }
}

pub fn fake_pdf(label: &str, pages: u32) -> Vec<u8> {
    format!("{}:{}", label, pages).into_bytes()
}

pub fn parse_fake(bytes: &[u8]) -> FakeDoc {
    serde_json::from_slice(bytes).unwrap()
}

impl DocumentEngine for FakeEngine {
    type Document = FakeDoc;
    type Font = StandardFont;
    type Image = ();

    fn load(&self, bytes: &[u8]) -> Result<FakeDoc> {
        if bytes.starts_with(b"{") {
            let mut doc: FakeDoc = serde_json::from_slice(bytes)
                .map_err(|e| PdfToolsError::Processing(e.to_string()))?;
            doc.saved_with = None;
            return Ok(doc);
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|_| PdfToolsError::Processing("not a fake document".into()))?;
        let (label, count) = text
            .split_once(':')
            .ok_or_else(|| PdfToolsError::Processing("not a fake document".into()))?;
        let count: u32 = count
            .parse()
            .map_err(|_| PdfToolsError::Processing("bad page count".into()))?;
        Ok(FakeDoc {
            pages: (1..=count)
                .map(|n| FakePage {
                    label: format!("{}{}", label, n),
                    size: PageSize {
                        width: 612.0,
                        height: 792.0,
                    },
                    texts: Vec::new(),
                    images: Vec::new(),
                })
                .collect(),
            ..FakeDoc::default()
        })
    }

    fn create(&self) -> Result<FakeDoc> {
        Ok(FakeDoc::default())
    }

    fn page_count(&self, doc: &FakeDoc) -> u32 {
        doc.pages.len() as u32
    }

    fn page_size(&self, doc: &FakeDoc, page: u32) -> Result<PageSize> {
        doc.pages
            .get(page as usize)
            .map(|p| p.size)
            .ok_or_else(|| PdfToolsError::Processing(format!("no page {}", page)))
    }

    fn copy_pages(&self, dest: &mut FakeDoc, source: &FakeDoc, pages: &[u32]) -> Result<()> {
        for &page in pages {
            let copied = source
                .pages
                .get(page as usize)
                .cloned()
                .ok_or_else(|| PdfToolsError::Processing(format!("no page {}", page)))?;
            dest.pages.push(copied);
        }
        Ok(())
    }

    fn add_page(&self, doc: &mut FakeDoc, size: PageSize) -> Result<u32> {
        doc.pages.push(FakePage {
            label: format!("new{}", doc.pages.len() + 1),
            size,
            texts: Vec::new(),
            images: Vec::new(),
        });
        Ok(doc.pages.len() as u32 - 1)
    }

    fn embed_font(&self, doc: &mut FakeDoc, font: StandardFont) -> Result<StandardFont> {
        doc.fonts.push(font.base_font().to_string());
        Ok(font)
    }

    fn embed_image(&self, doc: &mut FakeDoc, _image: &RasterImage) -> Result<()> {
        doc.images += 1;
        Ok(())
    }

    fn draw_text(
        &self,
        doc: &mut FakeDoc,
        page: u32,
        _font: &StandardFont,
        run: &TextRun<'_>,
    ) -> Result<()> {
        let target = doc
            .pages
            .get_mut(page as usize)
            .ok_or_else(|| PdfToolsError::Processing(format!("no page {}", page)))?;
        target.texts.push((run.text.to_string(), run.y));
        Ok(())
    }

    fn draw_image(
        &self,
        doc: &mut FakeDoc,
        page: u32,
        _image: &(),
        placement: Placement,
    ) -> Result<()> {
        let target = doc
            .pages
            .get_mut(page as usize)
            .ok_or_else(|| PdfToolsError::Processing(format!("no page {}", page)))?;
        target.images.push((
            placement.x,
            placement.y,
            placement.width,
            placement.height,
        ));
        Ok(())
    }

    fn save(&self, mut doc: FakeDoc, options: SaveOptions) -> Result<Vec<u8>> {
        doc.saved_with = Some(options.level.to_string());
        serde_json::to_vec(&doc).map_err(|e| PdfToolsError::Processing(e.to_string()))
    }
}

/// `FakeEngine` whose documents refuse to grow past `max_pages`
pub struct PageLimitEngine {
    pub max_pages: usize,
}

impl DocumentEngine for PageLimitEngine {
    type Document = FakeDoc;
    type Font = StandardFont;
    type Image = ();

    fn load(&self, bytes: &[u8]) -> Result<FakeDoc> {
        FakeEngine.load(bytes)
    }

    fn create(&self) -> Result<FakeDoc> {
        FakeEngine.create()
    }

    fn page_count(&self, doc: &FakeDoc) -> u32 {
        FakeEngine.page_count(doc)
    }

    fn page_size(&self, doc: &FakeDoc, page: u32) -> Result<PageSize> {
        FakeEngine.page_size(doc, page)
    }

    fn copy_pages(&self, dest: &mut FakeDoc, source: &FakeDoc, pages: &[u32]) -> Result<()> {
        FakeEngine.copy_pages(dest, source, pages)
    }

    fn add_page(&self, doc: &mut FakeDoc, size: PageSize) -> Result<u32> {
        if doc.pages.len() >= self.max_pages {
            return Err(PdfToolsError::Processing(format!(
                "page limit of {} reached",
                self.max_pages
            )));
        }
        FakeEngine.add_page(doc, size)
    }

    fn embed_font(&self, doc: &mut FakeDoc, font: StandardFont) -> Result<StandardFont> {
        FakeEngine.embed_font(doc, font)
    }

    fn embed_image(&self, doc: &mut FakeDoc, image: &RasterImage) -> Result<()> {
        FakeEngine.embed_image(doc, image)
    }

    fn draw_text(
        &self,
        doc: &mut FakeDoc,
        page: u32,
        font: &StandardFont,
        run: &TextRun<'_>,
    ) -> Result<()> {
        FakeEngine.draw_text(doc, page, font, run)
    }

    fn draw_image(
        &self,
        doc: &mut FakeDoc,
        page: u32,
        image: &(),
        placement: Placement,
    ) -> Result<()> {
        FakeEngine.draw_image(doc, page, image, placement)
    }

    fn save(&self, doc: FakeDoc, options: SaveOptions) -> Result<Vec<u8>> {
        FakeEngine.save(doc, options)
    }
}
