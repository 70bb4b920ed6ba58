//! PDF Compression
//!
//! Re-serializes a document with stream compression. The level decides how
//! much structural cleanup runs first.

use crate::engine::{CompressionLevel, DocumentEngine, SaveOptions};
use crate::error::Result;
use tracing::debug;

pub fn compress_document<E: DocumentEngine>(
    engine: &E,
    bytes: &[u8],
    level: CompressionLevel,
) -> Result<Vec<u8>> {
    let doc = engine.load(bytes)?;
    let out = engine.save(doc, SaveOptions { level })?;
    debug!(%level, before = bytes.len(), after = out.len(), "compressed document");
    Ok(out)
}
