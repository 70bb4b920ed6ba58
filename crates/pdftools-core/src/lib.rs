//! Client-side PDF tools
//!
//! Merge, split, compress, page deletion, form filling and conversion of
//! images and Word files into PDF. The PDF object model lives behind the
//! [`DocumentEngine`] trait; [`LopdfEngine`] implements it with lopdf.
//!
//! A [`Session`] holds the state of one tool page: pick a feature, add files,
//! adjust settings, run, download the [`ProcessedArtifact`].

pub mod artifact;
pub mod command;
pub mod compress;
pub mod convert;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod feature;
pub mod fill_form;
pub mod lopdf_engine;
pub mod merge;
pub mod orchestrator;
pub mod ranges;
pub mod raster;
pub mod session;
pub mod settings;
pub mod split;
pub mod upload;

#[cfg(test)]
mod testutil;

pub use artifact::{suggested_file_name, ProcessedArtifact};
pub use command::{ProcessMetrics, ProcessResult};
pub use dispatch::{profile, FeatureProfile, FieldKind, SettingField};
pub use engine::{CompressionLevel, DocumentEngine, PageSize, SaveOptions};
pub use error::{FileCount, PdfToolsError, Result};
pub use feature::{Feature, FeatureId, FEATURES};
pub use lopdf_engine::LopdfEngine;
pub use ranges::{pages_to_keep, parse_page_range, PageSelection};
pub use session::{RunFailure, Session};
pub use settings::{FeatureSettings, FormFields, FormPosition, ProcessSettings};
pub use upload::{InputFile, UploadLimits, UploadRejection, UploadedFileSet};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32> {
    let engine = LopdfEngine;
    let doc = engine.load(bytes)?;
    Ok(engine.page_count(&doc))
}
