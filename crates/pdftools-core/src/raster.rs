//! Raster image decoding for PDF embedding
//!
//! PNG data is decoded to 8-bit samples and re-deflated for a FlateDecode
//! image stream, with any alpha channel split into a soft mask. JPEG data is
//! passed through untouched as DCTDecode; only its frame header is read.

use crate::error::{PdfToolsError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Raster formats that can be embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(RasterFormat::Png),
            "image/jpeg" | "image/jpg" => Some(RasterFormat::Jpeg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
            ColorSpace::Cmyk => "DeviceCMYK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    /// Baseline or progressive JPEG, embedded as-is
    ///
    /// `adobe` is set when the file has an Adobe APP14 segment; CMYK samples
    /// in such files are stored inverted.
    Jpeg { bytes: Vec<u8>, adobe: bool },
    /// Zlib-compressed 8-bit samples, plus an optional compressed alpha plane
    Flate {
        samples: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// Image ready to become a PDF image XObject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub data: ImageData,
}

pub fn decode(bytes: &[u8], format: RasterFormat) -> Result<RasterImage> {
    match format {
        RasterFormat::Png => decode_png(bytes),
        RasterFormat::Jpeg => decode_jpeg(bytes),
    }
}

fn decode_png(bytes: &[u8]) -> Result<RasterImage> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e| PdfToolsError::Image(format!("invalid PNG: {}", e)))?;
    let mut buffer = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buffer)
        .map_err(|e| PdfToolsError::Image(format!("invalid PNG: {}", e)))?;
    buffer.truncate(frame.buffer_size());

    let (color_space, channels, has_alpha) = match frame.color_type {
        png::ColorType::Grayscale => (ColorSpace::Gray, 1, false),
        png::ColorType::GrayscaleAlpha => (ColorSpace::Gray, 2, true),
        png::ColorType::Rgb => (ColorSpace::Rgb, 3, false),
        png::ColorType::Rgba => (ColorSpace::Rgb, 4, true),
        png::ColorType::Indexed => {
            return Err(PdfToolsError::Image(
                "indexed PNG was not expanded".to_string(),
            ))
        }
    };

    let (samples, alpha) = if has_alpha {
        let pixels = buffer.len() / channels;
        let mut color = Vec::with_capacity(pixels * (channels - 1));
        let mut alpha = Vec::with_capacity(pixels);
        for pixel in buffer.chunks_exact(channels) {
            color.extend_from_slice(&pixel[..channels - 1]);
            alpha.push(pixel[channels - 1]);
        }
        (color, Some(alpha))
    } else {
        (buffer, None)
    };

    Ok(RasterImage {
        width: frame.width,
        height: frame.height,
        color_space,
        data: ImageData::Flate {
            samples: deflate(&samples)?,
            alpha: alpha.as_deref().map(deflate).transpose()?,
        },
    })
}

fn decode_jpeg(bytes: &[u8]) -> Result<RasterImage> {
    let header = jpeg_frame_header(bytes)?;

    let color_space = match header.components {
        1 => ColorSpace::Gray,
        3 => ColorSpace::Rgb,
        4 => ColorSpace::Cmyk,
        n => {
            return Err(PdfToolsError::Image(format!(
                "unsupported JPEG component count {}",
                n
            )))
        }
    };

    Ok(RasterImage {
        width: header.width,
        height: header.height,
        color_space,
        data: ImageData::Jpeg {
            bytes: bytes.to_vec(),
            adobe: header.adobe,
        },
    })
}

struct JpegHeader {
    width: u32,
    height: u32,
    components: u8,
    adobe: bool,
}

/// Walk JPEG markers up to the first start-of-frame and read its dimensions
fn jpeg_frame_header(bytes: &[u8]) -> Result<JpegHeader> {
    let invalid = |msg: &str| PdfToolsError::Image(format!("invalid JPEG: {}", msg));

    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err(invalid("missing SOI marker"));
    }

    let mut adobe = false;
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(invalid("expected marker"));
        }
        let marker = bytes[pos + 1];

        // Fill bytes and standalone markers carry no length
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD8).contains(&marker) {
            pos += 2;
            continue;
        }
        if marker == 0xDA || marker == 0xD9 {
            return Err(invalid("no frame header before scan data"));
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if length < 2 {
            return Err(invalid("segment length too small"));
        }

        if marker == 0xEE && bytes[pos + 4..].starts_with(b"Adobe") {
            adobe = true;
        }

        if is_start_of_frame(marker) {
            if pos + 10 > bytes.len() {
                return Err(invalid("truncated frame header"));
            }
            let height = u16::from_be_bytes([bytes[pos + 5], bytes[pos + 6]]) as u32;
            let width = u16::from_be_bytes([bytes[pos + 7], bytes[pos + 8]]) as u32;
            let components = bytes[pos + 9];
            if width == 0 || height == 0 {
                return Err(invalid("zero image dimension"));
            }
            return Ok(JpegHeader {
                width,
                height,
                components,
                adobe,
            });
        }

        pos += 2 + length;
    }

    Err(invalid("no frame header found"))
}

fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| PdfToolsError::Image(format!("compression failed: {}", e)))
}
