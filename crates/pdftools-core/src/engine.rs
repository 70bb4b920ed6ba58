//! Document engine abstraction
//!
//! Every transform talks to the PDF library through `DocumentEngine`, so the
//! orchestration can run against `LopdfEngine` in production and a fake in
//! tests. Page indices are 0-based throughout.

use crate::error::Result;
use crate::raster::RasterImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// Axis-aligned rectangle in page space, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// RGB fill color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREY: Rgb = Rgb(0.5, 0.5, 0.5);
}

/// One of the PDF standard 14 fonts that needs no embedding of glyph data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// A single line of text to draw
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
}

/// How much cleanup `save` performs before writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Compress streams only
    Low,
    /// Also drop objects unreachable from the catalog
    #[default]
    Medium,
    /// Also drop empty streams and renumber objects densely
    High,
}

impl CompressionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(CompressionLevel::Low),
            "medium" => Ok(CompressionLevel::Medium),
            "high" => Ok(CompressionLevel::High),
            other => Err(format!(
                "unknown compression level '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub level: CompressionLevel,
}

/// Narrow capability surface over a PDF library
pub trait DocumentEngine {
    type Document;
    type Font: Clone;
    type Image;

    /// Parse an existing PDF
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    /// Create an empty document with no pages
    fn create(&self) -> Result<Self::Document>;

    fn page_count(&self, doc: &Self::Document) -> u32;

    fn page_size(&self, doc: &Self::Document, page: u32) -> Result<PageSize>;

    /// Append copies of `pages` from `source` to the end of `dest`, in the given order
    fn copy_pages(
        &self,
        dest: &mut Self::Document,
        source: &Self::Document,
        pages: &[u32],
    ) -> Result<()>;

    /// Append a blank page and return its index
    fn add_page(&self, doc: &mut Self::Document, size: PageSize) -> Result<u32>;

    fn embed_font(&self, doc: &mut Self::Document, font: StandardFont) -> Result<Self::Font>;

    fn embed_image(&self, doc: &mut Self::Document, image: &RasterImage) -> Result<Self::Image>;

    fn draw_text(
        &self,
        doc: &mut Self::Document,
        page: u32,
        font: &Self::Font,
        run: &TextRun<'_>,
    ) -> Result<()>;

    fn draw_image(
        &self,
        doc: &mut Self::Document,
        page: u32,
        image: &Self::Image,
        placement: Placement,
    ) -> Result<()>;

    /// Serialize the document, consuming it
    fn save(&self, doc: Self::Document, options: SaveOptions) -> Result<Vec<u8>>;
}
