//! Form filling
//!
//! Writes the supplied field values as text onto the first page.

use crate::engine::{DocumentEngine, Rgb, SaveOptions, StandardFont, TextRun};
use crate::error::{PdfToolsError, Result};
use crate::settings::{FormFields, FormPosition};
use chrono::NaiveDateTime;

const LEFT_MARGIN: f32 = 50.0;
const LINE_GAP: f32 = 25.0;
const TITLE_GAP: f32 = 40.0;
/// Baseline of the timestamp; no field is drawn at or below it
const FOOTER_Y: f32 = 50.0;

pub fn fill_form<E: DocumentEngine>(
    engine: &E,
    bytes: &[u8],
    fields: &FormFields,
    position: FormPosition,
    filled_at: NaiveDateTime,
) -> Result<Vec<u8>> {
    let mut doc = engine.load(bytes)?;
    if engine.page_count(&doc) == 0 {
        return Err(PdfToolsError::Processing("Document has no pages".into()));
    }

    let height = engine.page_size(&doc, 0)?.height;
    let font = engine.embed_font(&mut doc, StandardFont::Helvetica)?;

    let mut y = block_top(height, position, fields.len());
    engine.draw_text(
        &mut doc,
        0,
        &font,
        &TextRun {
            text: "Filled Form Data",
            x: LEFT_MARGIN,
            y,
            size: 18.0,
            color: Rgb::BLACK,
        },
    )?;
    y -= TITLE_GAP;

    for (key, value) in fields.iter() {
        if y <= FOOTER_Y {
            break;
        }
        let line = format!("{}: {}", key, value);
        engine.draw_text(
            &mut doc,
            0,
            &font,
            &TextRun {
                text: &line,
                x: LEFT_MARGIN,
                y,
                size: 12.0,
                color: Rgb::BLACK,
            },
        )?;
        y -= LINE_GAP;
    }

    let stamp = format!("Form filled on: {}", filled_at.format("%d.%m.%Y %H:%M:%S"));
    engine.draw_text(
        &mut doc,
        0,
        &font,
        &TextRun {
            text: &stamp,
            x: LEFT_MARGIN,
            y: FOOTER_Y,
            size: 10.0,
            color: Rgb::GREY,
        },
    )?;

    engine.save(doc, SaveOptions::default())
}

/// Baseline of the title line for a block of `fields` lines
fn block_top(page_height: f32, position: FormPosition, fields: usize) -> f32 {
    let highest = page_height - 100.0;
    let body = TITLE_GAP + LINE_GAP * fields.saturating_sub(1) as f32;

    let top = match position {
        FormPosition::Top => highest,
        FormPosition::Center => (page_height + body) / 2.0,
        FormPosition::Bottom => FOOTER_Y + LINE_GAP + body,
    };
    top.min(highest)
}
