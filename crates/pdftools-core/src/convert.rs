//! Conversions into PDF: images and Word documents

use crate::engine::{DocumentEngine, PageSize, Placement, Rgb, SaveOptions, StandardFont, TextRun};
use crate::error::{PdfToolsError, Result};
use crate::raster::{self, RasterFormat};
use crate::upload::InputFile;
use chrono::NaiveDate;
use tracing::debug;

/// Share of the page an image may cover along its limiting axis
const IMAGE_FILL: f32 = 0.8;

/// Lay out one image per A4 page, in input order
///
/// Every file's declared media type is checked before any work starts, so an
/// unsupported file fails the batch without decoding the others.
pub fn images_to_pdf<E: DocumentEngine>(engine: &E, files: &[InputFile]) -> Result<Vec<u8>> {
    let formats = files
        .iter()
        .map(|file| {
            let media_type = file.declared_media_type();
            RasterFormat::from_media_type(&media_type).ok_or_else(|| {
                PdfToolsError::UnsupportedFormat {
                    file: file.name.clone(),
                    media_type,
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut doc = engine.create()?;

    for (file, format) in files.iter().zip(formats) {
        let image = raster::decode(&file.bytes, format).map_err(|e| e.in_file(&file.name))?;
        let embedded = engine
            .embed_image(&mut doc, &image)
            .map_err(|e| e.in_file(&file.name))?;

        let page = engine
            .add_page(&mut doc, PageSize::A4)
            .map_err(|e| e.in_file(&file.name))?;
        let placement = fit_centered(PageSize::A4, image.width as f32, image.height as f32);
        engine
            .draw_image(&mut doc, page, &embedded, placement)
            .map_err(|e| e.in_file(&file.name))?;

        debug!(file = %file.name, width = image.width, height = image.height, "embedded image");
    }

    engine.save(doc, SaveOptions::default())
}

/// Scale an image to 80% of the largest size that fits the page, centered
pub fn fit_centered(page: PageSize, width: f32, height: f32) -> Placement {
    let scale = (page.width / width).min(page.height / height) * IMAGE_FILL;
    let scaled_width = width * scale;
    let scaled_height = height * scale;

    Placement {
        x: (page.width - scaled_width) / 2.0,
        y: (page.height - scaled_height) / 2.0,
        width: scaled_width,
        height: scaled_height,
    }
}

/// Produce a one-page summary PDF for a Word document
///
/// The document body is not parsed; the page records the source file's
/// name, size and conversion date.
pub fn word_to_pdf<E: DocumentEngine>(
    engine: &E,
    file: &InputFile,
    converted_on: NaiveDate,
) -> Result<Vec<u8>> {
    let mut doc = engine.create()?;
    let page = engine.add_page(&mut doc, PageSize::A4)?;
    let height = engine.page_size(&doc, page)?.height;

    let title_font = engine.embed_font(&mut doc, StandardFont::HelveticaBold)?;
    let body_font = engine.embed_font(&mut doc, StandardFont::Helvetica)?;

    engine.draw_text(
        &mut doc,
        page,
        &title_font,
        &TextRun {
            text: "Converted from Word",
            x: 50.0,
            y: height - 50.0,
            size: 24.0,
            color: Rgb::BLACK,
        },
    )?;

    let size_kb = format!("File size: {:.2} KB", file.size() as f64 / 1024.0);
    let name = format!("File name: {}", file.name);
    let date = format!("Converted on: {}", converted_on.format("%d.%m.%Y"));

    let lines: [(&str, f32, Rgb); 5] = [
        (name.as_str(), 50.0, Rgb::BLACK),
        (size_kb.as_str(), 30.0, Rgb::BLACK),
        (date.as_str(), 30.0, Rgb::BLACK),
        (
            "The Word document was converted to PDF.",
            50.0,
            Rgb::BLACK,
        ),
        (
            "Note: the document is summarized in PDF format.",
            30.0,
            Rgb::GREY,
        ),
    ];

    let mut y = height - 50.0;
    for (text, gap, color) in lines {
        y -= gap;
        engine.draw_text(
            &mut doc,
            page,
            &body_font,
            &TextRun {
                text,
                x: 50.0,
                y,
                size: 12.0,
                color,
            },
        )?;
    }

    engine.save(doc, SaveOptions::default())
}
